//! Integration tests for CLI argument handling
//!
//! Runs the binary for the paths that never reach the network.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_wanikani"))
        .args(args)
        .env_remove("WANIKANI_API_TOKEN")
        .env_remove("WANIKANI_CACHE_DIR")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute wanikani")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("wanikani"), "Help should mention wanikani");
    assert!(stdout.contains("prune"), "Help should list the prune command");
    assert!(stdout.contains("--no-cache"), "Help should mention --no-cache");
}

#[test]
fn test_missing_subcommand_fails() {
    let output = run_cli(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_missing_token_prints_error_and_exits() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let cache_dir = dir.path().to_string_lossy().to_string();
    let output = run_cli(&["--cache-dir", &cache_dir, "user"]);
    assert!(!output.status.success(), "Expected missing token to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("WANIKANI_API_TOKEN"),
        "Should explain how to supply a token: {}",
        stderr
    );
}

#[test]
fn test_invalid_timestamp_prints_error_and_exits() {
    let output = run_cli(&["subjects", "--updated-after", "last-tuesday"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid timestamp"),
        "Should print error message about the timestamp: {}",
        stderr
    );
}

#[test]
fn test_prune_runs_without_token() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(dir.path().join("0123abcd.json"), r#"{"data": 1}"#)
        .expect("Failed to write cache file");
    let cache_dir = dir.path().to_string_lossy().to_string();

    let output = run_cli(&["--cache-dir", &cache_dir, "prune"]);
    assert!(output.status.success(), "Prune should not need a token");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Removed 0"), "Fresh file should survive: {}", stdout);
    assert!(dir.path().join("0123abcd.json").exists());
}

#[test]
fn test_prune_with_zero_age_clears_cache() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let file = dir.path().join("0123abcd.json");
    fs::write(&file, r#"{"data": 1}"#).expect("Failed to write cache file");
    fs::File::options()
        .write(true)
        .open(&file)
        .and_then(|f| {
            f.set_modified(std::time::SystemTime::now() - std::time::Duration::from_secs(60))
        })
        .expect("Failed to backdate cache file");
    let cache_dir = dir.path().to_string_lossy().to_string();

    let output = run_cli(&["--cache-dir", &cache_dir, "prune", "--max-age-hours", "0"]);
    assert!(output.status.success());
    assert!(!file.exists());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use wanikani::cli::{parse_timestamp_arg, Cli, Command};

    #[test]
    fn test_cli_status_command() {
        let cli = Cli::parse_from(["wanikani", "status"]);
        assert_eq!(cli.command, Command::Status);
    }

    #[test]
    fn test_cli_subjects_with_id() {
        let cli = Cli::parse_from(["wanikani", "subjects", "--id", "440"]);
        assert_eq!(
            cli.command,
            Command::Subjects {
                updated_after: None,
                id: Some(440)
            }
        );
    }

    #[test]
    fn test_cli_assignments_with_updated_after() {
        let cli = Cli::parse_from([
            "wanikani",
            "assignments",
            "--updated-after",
            "2024-01-31T12:00:00Z",
        ]);
        let expected = parse_timestamp_arg("2024-01-31T12:00:00Z").unwrap();
        assert_eq!(
            cli.command,
            Command::Assignments {
                updated_after: Some(expected)
            }
        );
    }

    #[test]
    fn test_cli_prune_is_tokenless() {
        let cli = Cli::parse_from(["wanikani", "prune", "--max-age-hours", "24"]);
        assert!(!cli.needs_token());
        assert_eq!(cli.command, Command::Prune { max_age_hours: 24 });
    }

    #[test]
    fn test_parse_timestamp_arg_invalid_returns_error() {
        assert!(parse_timestamp_arg("not-a-time").is_err());
    }
}
