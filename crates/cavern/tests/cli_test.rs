//! # CLI Tests
//!
//! Runs the `cavern` binary end to end.

use std::process::Command;

fn cavern(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_cavern"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

/// Test: A seeded run prints the map and nothing else on stdout.
#[test]
fn test_prints_map() {
    let output = cavern(&["--height", "10", "--width", "25", "--seed", "7"]);
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 10);
    assert!(lines.iter().all(|l| l.chars().count() == 25));
}

/// Test: The same seed prints the same map.
#[test]
fn test_seeded_runs_match() {
    let a = cavern(&["--seed", "1234", "--rooms"]);
    let b = cavern(&["--seed", "1234", "--rooms"]);
    assert!(a.status.success());
    assert_eq!(a.stdout, b.stdout);
}

/// Test: Bad arguments exit with status 1 and explain on stderr.
#[test]
fn test_bad_arguments_fail() {
    for args in [&["--width", "zero"][..], &["--bogus"][..], &["--height", "0"][..]] {
        let output = cavern(args);
        assert_eq!(output.status.code(), Some(1), "{args:?} should fail");
        assert!(output.stdout.is_empty());
        assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
    }
}

/// Test: Help goes to stdout and succeeds.
#[test]
fn test_help() {
    let output = cavern(&["--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Usage: cavern"));
}
