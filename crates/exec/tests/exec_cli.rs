// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box tests of the runner binary and its exit-code protocol.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // Command::cargo_bin is deprecated but still functional

use std::time::Duration;

use assert_cmd::Command;
use maestro_core::{keys, ErrorKind};
use maestro_script::{exit_codes, ProcessRunner, ScriptRunner};
use tokio_util::sync::CancellationToken;

fn maestro_exec() -> Command {
    let mut cmd = Command::cargo_bin("maestro-exec").unwrap();
    cmd.env_remove("MAESTRO_INTERPRETER")
        .env_remove("MAESTRO_EXEC_TIMEOUT_MS")
        .env_remove("MAESTRO_LOG")
        .args(["--interpreter", "/bin/sh"]);
    cmd
}

#[test]
fn success_prints_stdout_and_exits_zero() {
    maestro_exec()
        .write_stdin("echo 'playing|75|120|true|off|42'")
        .assert()
        .success()
        .stdout("playing|75|120|true|off|42\n");
}

#[test]
fn failure_exits_one_with_stderr() {
    let assert = maestro_exec()
        .write_stdin("echo \"Music got an error: Can't get track\" >&2; exit 1")
        .assert()
        .code(exit_codes::FAILURE);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("Can't get track"), "stderr = {stderr}");
}

#[test]
fn timeout_exits_two() {
    let assert = maestro_exec()
        .args(["--timeout-ms", "200"])
        .write_stdin("sleep 30")
        .assert()
        .code(exit_codes::TIMEOUT);
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(
        stderr.contains("timed out after 200ms"),
        "stderr = {stderr}"
    );
}

#[test]
fn timeout_from_environment() {
    maestro_exec()
        .env("MAESTRO_EXEC_TIMEOUT_MS", "200")
        .write_stdin("sleep 30")
        .assert()
        .code(exit_codes::TIMEOUT);
}

#[test]
fn empty_stdin_exits_one() {
    maestro_exec()
        .write_stdin("  \n")
        .assert()
        .code(exit_codes::FAILURE);
}

#[test]
fn missing_interpreter_exits_one() {
    Command::cargo_bin("maestro-exec")
        .unwrap()
        .args(["--interpreter", "/nonexistent/osascript"])
        .write_stdin("return 1")
        .assert()
        .code(exit_codes::FAILURE);
}

#[test]
fn log_output_stays_off_by_default() {
    let assert = maestro_exec().write_stdin("echo ok").assert().success();
    assert!(assert.get_output().stderr.is_empty());
}

// --- Through the process runner ---

fn runner() -> ProcessRunner {
    ProcessRunner::new(
        env!("CARGO_BIN_EXE_maestro-exec"),
        ["--interpreter", "/bin/sh", "--timeout-ms", "300"]
            .map(String::from)
            .to_vec(),
    )
}

#[tokio::test]
async fn process_runner_reads_trimmed_output() {
    let script = "printf '42|Song|Artist|Album|245\\n'";
    let out = runner()
        .run(script, Duration::from_secs(10), &CancellationToken::new())
        .await
        .unwrap();
    let track = maestro_core::decode_track(&out).unwrap().unwrap();
    assert_eq!(track.title(), "Song");
}

#[tokio::test]
async fn process_runner_maps_runner_timeout() {
    let err = runner()
        .run(
            "sleep 30",
            Duration::from_secs(10),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(err.context_i64(keys::EXIT_CODE), Some(2));
}

#[tokio::test]
async fn process_runner_maps_runner_failure() {
    let err = runner()
        .run(
            "echo denied >&2; exit 1",
            Duration::from_secs(10),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationFailed);
    assert!(
        err.message().contains("denied"),
        "message = {}",
        err.message()
    );
    assert_eq!(err.context_i64(keys::EXIT_CODE), Some(1));
}
