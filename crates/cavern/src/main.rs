//! # CAVERN
//!
//! Prints a seeded cave map to stdout. Logs go to stderr; set `RUST_LOG`
//! to control them.

use std::process::ExitCode;

use cavern::{parse_args, run, Command, USAGE};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cavern=info,cavern_procedural=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let options = match parse_args(std::env::args().skip(1)) {
        Ok(Command::Run(options)) => options,
        Ok(Command::Help) => {
            print!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}");
            eprint!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = std::io::stdout();
    match run(&options, &mut stdout.lock()) {
        Ok(seed) => {
            tracing::debug!(seed = seed.value(), "done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
