//! # CAVERN Command Line
//!
//! Argument parsing and text output for the `cavern` binary.
//!
//! ## Usage
//!
//! ```bash
//! cavern --height 32 --width 98 --seed 42 --rooms
//! cavern --seed 42 --steps --iterations 8
//! RUST_LOG=cavern_procedural=debug cavern --config cave.toml
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]

use std::io::Write;
use std::path::PathBuf;

use cavern_procedural::{CaveGenerator, GenerationConfig, GenerationError, Grid, MapSeed, StepSequence};
use thiserror::Error;

/// Map height when `--height` is not given.
pub const DEFAULT_HEIGHT: usize = 32;

/// Map width when `--width` is not given.
pub const DEFAULT_WIDTH: usize = 98;

/// Help text.
pub const USAGE: &str = "\
Usage: cavern [OPTIONS]

Options:
  -H, --height <ROWS>        Map height (default: 32)
  -W, --width <COLS>         Map width (default: 98)
  -s, --seed <SEED>          64-bit seed (default: random)
  -i, --iterations <N>       Automaton rounds (default: from config, else 5)
      --steps                Print every distinct round
      --rooms                Carve connected rooms into the cave
  -c, --config <FILE>        TOML generation config
  -h, --help                 Show this help
";

/// Command line errors.
#[derive(Error, Debug)]
pub enum CliError {
    /// A flag that takes a value was last on the line.
    #[error("missing value for {0}")]
    MissingValue(String),

    /// A flag value did not parse.
    #[error("invalid value {value:?} for {flag}")]
    InvalidValue {
        /// The flag.
        flag: String,
        /// The rejected value.
        value: String,
    },

    /// Unrecognised argument.
    #[error("unknown argument: {0}")]
    UnknownArgument(String),

    /// `--steps` and `--rooms` were both given.
    #[error("--steps and --rooms cannot be combined")]
    ConflictingModes,

    /// Generation or config failure.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Writing the map failed.
    #[error("failed to write map: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// What to print.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// The final cave.
    #[default]
    Final,
    /// Every distinct automaton round.
    Steps,
    /// The final cave with rooms.
    Rooms,
}

/// Parsed options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Options {
    /// Map height.
    pub height: usize,
    /// Map width.
    pub width: usize,
    /// Explicit seed, or `None` for OS entropy.
    pub seed: Option<u64>,
    /// Overrides the configured round count.
    pub iterations: Option<usize>,
    /// Output mode.
    pub mode: OutputMode,
    /// Config file to load.
    pub config: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            height: DEFAULT_HEIGHT,
            width: DEFAULT_WIDTH,
            seed: None,
            iterations: None,
            mode: OutputMode::Final,
            config: None,
        }
    }
}

/// A parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Generate and print a map.
    Run(Options),
    /// Print usage.
    Help,
}

/// Parses arguments (without the program name).
///
/// # Errors
///
/// Returns a [`CliError`] for unknown flags, missing or malformed values,
/// or conflicting modes.
pub fn parse_args<I>(args: I) -> CliResult<Command>
where
    I: IntoIterator<Item = String>,
{
    let args: Vec<String> = args.into_iter().collect();
    let mut options = Options::default();
    let mut steps = false;
    let mut rooms = false;

    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--height" | "-H" => {
                options.height = parse_value(flag, args.get(i + 1))?;
                i += 1;
            }
            "--width" | "-W" => {
                options.width = parse_value(flag, args.get(i + 1))?;
                i += 1;
            }
            "--seed" | "-s" => {
                options.seed = Some(parse_value(flag, args.get(i + 1))?);
                i += 1;
            }
            "--iterations" | "-i" => {
                options.iterations = Some(parse_value(flag, args.get(i + 1))?);
                i += 1;
            }
            "--config" | "-c" => {
                let path = args
                    .get(i + 1)
                    .ok_or_else(|| CliError::MissingValue(flag.to_string()))?;
                options.config = Some(PathBuf::from(path));
                i += 1;
            }
            "--steps" => steps = true,
            "--rooms" => rooms = true,
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(CliError::UnknownArgument(other.to_string())),
        }
        i += 1;
    }

    options.mode = match (steps, rooms) {
        (true, true) => return Err(CliError::ConflictingModes),
        (true, false) => OutputMode::Steps,
        (false, true) => OutputMode::Rooms,
        (false, false) => OutputMode::Final,
    };

    Ok(Command::Run(options))
}

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> CliResult<T> {
    let value = value.ok_or_else(|| CliError::MissingValue(flag.to_string()))?;
    value.parse().map_err(|_| CliError::InvalidValue {
        flag: flag.to_string(),
        value: value.clone(),
    })
}

/// Writes one map, one line per row.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_map<W: Write>(out: &mut W, grid: &Grid) -> std::io::Result<()> {
    writeln!(out, "{grid}")
}

/// Writes each distinct round under a `step N` header.
///
/// # Errors
///
/// Propagates write failures.
pub fn write_steps<W: Write>(out: &mut W, steps: &StepSequence) -> std::io::Result<()> {
    for (index, grid) in steps.distinct() {
        writeln!(out, "step {index}")?;
        write_map(out, grid)?;
    }
    Ok(())
}

/// Loads the config, generates the requested output and writes it.
///
/// Returns the seed used, so a random map can be reproduced.
///
/// # Errors
///
/// Returns a [`CliError`] if the config is bad, generation fails, or
/// writing fails.
pub fn run<W: Write>(options: &Options, out: &mut W) -> CliResult<MapSeed> {
    let mut config = match &options.config {
        Some(path) => GenerationConfig::from_toml_file(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(iterations) = options.iterations {
        config.iterations = iterations;
    }
    let generator = CaveGenerator::new(config)?;

    let seed = match options.seed {
        Some(seed) => MapSeed::new(seed),
        None => MapSeed::from_entropy()?,
    };
    tracing::info!(
        seed = seed.value(),
        height = options.height,
        width = options.width,
        mode = ?options.mode,
        "generating map"
    );

    match options.mode {
        OutputMode::Final => {
            let grid = generator.generate(options.height, options.width, seed)?;
            write_map(out, &grid)?;
        }
        OutputMode::Steps => {
            let steps =
                generator.generate_with_steps(options.height, options.width, seed, config.iterations)?;
            write_steps(out, &steps)?;
        }
        OutputMode::Rooms => {
            let carving = generator.carve_rooms(options.height, options.width, seed)?;
            tracing::info!(
                rooms = carving.layout.rooms().len(),
                status = ?carving.layout.status(),
                "rooms carved"
            );
            write_map(out, &carving.grid)?;
        }
    }

    Ok(seed)
}
