//! End-to-end tests for the `ravenfoot` binary against the bundled library.

use std::path::PathBuf;
use std::process::{Command, Output};

use tempfile::TempDir;

fn ravenfoot_bin() -> String {
    std::env::var("CARGO_BIN_EXE_ravenfoot")
        .unwrap_or_else(|_| "target/release/ravenfoot".to_string())
}

fn library_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("library")
}

fn run(args: &[&str], history: &TempDir) -> Output {
    Command::new(ravenfoot_bin())
        .arg("--library")
        .arg(library_dir())
        .env("RAVENFOOT_HISTORY", history.path().join("history.txt"))
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_owned)
        .collect()
}

#[test]
fn test_quiet_prints_requested_count() {
    let history = TempDir::new().unwrap();
    let output = run(&["-q", "--no-history", "-c", "5"], &history);

    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 5);
    assert!(lines.iter().all(|l| !l.is_empty()));
    assert!(!history.path().join("history.txt").exists());
}

#[test]
fn test_seed_is_reproducible() {
    let history = TempDir::new().unwrap();
    let args = ["-q", "--no-history", "--seed", "2025", "-c", "3"];
    let first = run(&args, &history);
    let second = run(&args, &history);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn test_separator_splits_tokens() {
    let history = TempDir::new().unwrap();
    let output = run(
        &["-q", "--no-history", "-c", "4", "-w", "3", "-s", "0", "-n", "2", "--separator", " "],
        &history,
    );

    assert!(output.status.success());
    for line in stdout_lines(&output) {
        assert_eq!(line.split(' ').count(), 5, "line: {}", line);
    }
}

#[test]
fn test_history_appended() {
    let history = TempDir::new().unwrap();
    let output = run(&["-q", "-c", "2"], &history);
    assert!(output.status.success());

    let output = run(&["-q", "-c", "3"], &history);
    assert!(output.status.success());

    let content = std::fs::read_to_string(history.path().join("history.txt")).unwrap();
    assert_eq!(content.lines().count(), 5);
    assert!(content.lines().all(|l| l.contains('\t')));
}

#[test]
fn test_clear_history() {
    let history = TempDir::new().unwrap();
    run(&["-q", "-c", "1"], &history);
    assert!(history.path().join("history.txt").exists());

    let output = run(&["--clear-history", "--yes"], &history);
    assert!(output.status.success());
    assert!(!history.path().join("history.txt").exists());
}

#[test]
fn test_estimate_only() {
    let history = TempDir::new().unwrap();
    let output = run(&["-q", "--estimate-only", "-w", "0", "-s", "0", "-n", "3"], &history);

    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines, ["10.0"]);
}

#[test]
fn test_missing_library_fails() {
    let history = TempDir::new().unwrap();
    let output = Command::new(ravenfoot_bin())
        .args(["-q", "--no-history", "--library"])
        .arg(history.path().join("nope"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to load word lists"), "stderr: {}", stderr);
}

#[test]
fn test_missing_category_fails() {
    let history = TempDir::new().unwrap();
    let library = TempDir::new().unwrap();
    std::fs::write(library.path().join("english_words.txt"), "raven\nfoot\n").unwrap();

    let output = Command::new(ravenfoot_bin())
        .args(["-q", "--no-history", "-w", "2", "-s", "1", "-n", "0", "--library"])
        .arg(library.path())
        .env("RAVENFOOT_HISTORY", history.path().join("history.txt"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("special characters"), "stderr: {}", stderr);
}

#[test]
fn test_copy_out_of_range_fails() {
    let history = TempDir::new().unwrap();
    for n in ["0", "4"] {
        let output = run(&["-q", "--no-history", "-c", "3", "--copy", n], &history);

        assert!(!output.status.success(), "--copy {} should fail", n);
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("out of range"), "stderr: {}", stderr);
        assert!(output.stdout.is_empty());
    }
}

#[test]
fn test_help_describes_layout() {
    let history = TempDir::new().unwrap();
    let output = run(&["--help"], &history);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--layout"));
    assert!(stdout.contains("Token layout"), "stdout: {}", stdout);
    assert!(stdout.contains("--copy"));
}
