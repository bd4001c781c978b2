//! Smoke tests for the taskmesh CLI.
//!
//! These tests verify basic CLI functionality:
//! - `tm --version` / `tm --help` output
//! - JSON output by default, human output behind `-H`
//! - the node/sheet/simulate commands end-to-end

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the tm binary with config isolated from the user's.
fn tm() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tm"));
    cmd.env("TM_CONFIG", "/nonexistent/taskmesh-test-config.toml");
    cmd
}

#[test]
fn test_version_flag() {
    tm().arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tm"))
        .stdout(predicate::str::contains("0.2.0"));
}

#[test]
fn test_help_flag() {
    tm().arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("simulate"));
}

#[test]
fn test_node_list_outputs_json() {
    tm().args(["node", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "wf-100""#))
        .stdout(predicate::str::contains(r#""kind": "initiative""#));
}

#[test]
fn test_node_list_human() {
    tm().args(["-H", "node", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Workspace platform launch"))
        .stdout(predicate::str::contains("wf-121"));
}

#[test]
fn test_node_show_includes_children() {
    tm().args(["node", "show", "wf-120"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""wf-121""#))
        .stdout(predicate::str::contains(r#""wf-122""#))
        .stdout(predicate::str::contains(r#""durationDays""#));
}

#[test]
fn test_node_show_unknown_fails() {
    tm().args(["node", "show", "wf-999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("wf-999"));
}

#[test]
fn test_node_update_applies() {
    tm().args([
        "node", "update", "wf-121", "--status", "done", "--progress", "1.0", "--author", "alice",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains(r#""applied": true"#))
    .stdout(predicate::str::contains(r#""status": "done""#))
    .stdout(predicate::str::contains("alice"));
}

#[test]
fn test_node_update_unknown_is_reported_not_fatal() {
    tm().args(["node", "update", "wf-999", "--status", "done"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""applied": false"#));
}

#[test]
fn test_node_update_rejects_bad_status() {
    tm().args(["node", "update", "wf-121", "--status", "paused"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown status"));
}

#[test]
fn test_node_update_rejects_out_of_range_progress() {
    tm().args(["node", "update", "wf-121", "--progress", "2.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("progress"));
}

#[test]
fn test_history_empty_on_fresh_peer() {
    tm().args(["history"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));
}

#[test]
fn test_status_human_shows_build_info() {
    tm().args(["-H", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("taskmesh 0.2.0"))
        .stdout(predicate::str::contains("11 nodes"));
}

#[test]
fn test_sheet_create() {
    tm().args(["sheet", "create", "Repaint lobby", "--client", "Acme"])
        .assert()
        .success()
        .stdout(predicate::str::contains("JS-0001"))
        .stdout(predicate::str::contains("Repaint lobby"));
}

#[test]
fn test_simulate_converges() {
    tm().args(["simulate", "--peers", "3", "--updates", "9"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""converged": true"#));
}

#[test]
fn test_simulate_rejects_single_peer() {
    tm().args(["simulate", "--peers", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 2 peers"));
}

#[test]
fn test_invalid_command() {
    tm().arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
