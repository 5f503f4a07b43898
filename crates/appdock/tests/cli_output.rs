//! Integration tests for CLI output behavior
//!
//! Logs go to stderr as JSON; stdout carries only user-facing output.
//! The -q/--quiet flag drops everything below error level.

use std::process::Command;

/// Run the binary with an isolated HOME so tests never read or write
/// the developer's real catalog or instance store.
fn run_appdock(args: &[&str]) -> std::process::Output {
    let home = tempfile::TempDir::new().expect("Failed to create temp home");
    Command::new(env!("CARGO_BIN_EXE_appdock"))
        .env("HOME", home.path())
        .args(args)
        .output()
        .expect("Failed to execute appdock")
}

#[test]
fn test_list_stdout_is_clean() {
    let output = run_appdock(&["list"]);

    assert!(
        output.status.success(),
        "appdock list failed with exit code {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);

    // stdout should not contain JSON log lines
    assert!(
        !stdout.contains(r#""event":"#),
        "stdout should not contain JSON logs, got: {}",
        stdout
    );
    for line in stdout.lines() {
        let trimmed = line.trim();
        assert!(
            !trimmed.starts_with('{'),
            "stdout contains JSON line: {}",
            line
        );
    }
}

#[test]
fn test_list_empty_registry_message() {
    let output = run_appdock(&["list"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("No instances found"),
        "Empty registry should print a friendly message, got: {}",
        stdout
    );
}

#[test]
fn test_default_mode_emits_info_logs() {
    let output = run_appdock(&["list"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains(r#""level":"INFO""#),
        "Default mode should emit INFO logs to stderr, got: {}",
        stderr
    );
}

#[test]
fn test_quiet_flag_suppresses_info_logs() {
    let output = run_appdock(&["-q", "list"]);

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Quiet mode should suppress INFO logs, got: {}",
        stderr
    );
}

#[test]
fn test_quiet_flag_after_subcommand() {
    let output = run_appdock(&["list", "--quiet"]);

    assert!(
        output.status.success(),
        "appdock list --quiet failed with exit code {:?}",
        output.status.code()
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains(r#""level":"INFO""#),
        "Global quiet flag should work after the subcommand, got: {}",
        stderr
    );
}

#[test]
fn test_launch_unknown_app_fails() {
    let output = run_appdock(&["launch", "no-such-app-xyz"]);

    assert!(
        !output.status.success(),
        "Launching an unknown catalog id should fail"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no-such-app-xyz"),
        "Error output should mention the app id, got: {}",
        stderr
    );
}

#[test]
fn test_switch_unknown_instance_fails() {
    let output = run_appdock(&["switch", "missing-instance"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing-instance"),
        "Error output should mention the instance id, got: {}",
        stderr
    );
}

#[test]
fn test_explicit_missing_catalog_fails() {
    let output = run_appdock(&["--catalog", "/nonexistent/catalog.toml", "list"]);

    assert!(
        !output.status.success(),
        "An explicitly named catalog that does not exist should be an error"
    );
}
