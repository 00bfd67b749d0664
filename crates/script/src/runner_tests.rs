// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

/// Runner that feeds the script to `sh`, so test scripts are shell code.
fn sh() -> ProcessRunner {
    ProcessRunner::new("/bin/sh", Vec::new())
}

/// Runner that echoes the script back.
fn cat() -> ProcessRunner {
    ProcessRunner::new("/bin/sh", vec!["-c".to_string(), "cat".to_string()])
}

const TIMEOUT: Duration = Duration::from_secs(10);

fn exit_code(err: &DomainError) -> Option<i64> {
    err.context_i64(keys::EXIT_CODE)
}

#[tokio::test]
async fn success_returns_trimmed_stdout() {
    let cancel = CancellationToken::new();
    let script = "  hello world \n\n";
    let out = cat().run(script, TIMEOUT, &cancel).await.unwrap();
    assert_eq!(out, "hello world");
}

#[tokio::test]
async fn script_is_delivered_on_stdin() {
    let cancel = CancellationToken::new();
    let script = "printf '%s|%s' playing 75";
    let out = sh().run(script, TIMEOUT, &cancel).await;
    assert_eq!(out.unwrap(), "playing|75");
}

#[tokio::test]
async fn exit_one_carries_stderr() {
    let cancel = CancellationToken::new();
    let err = sh()
        .run("echo 'Music got an error' >&2; exit 1", TIMEOUT, &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationFailed);
    assert!(
        err.message().contains("Music got an error"),
        "message = {}",
        err.message()
    );
    assert_eq!(exit_code(&err), Some(1));
    assert_eq!(err.context_str(keys::STDERR), Some("Music got an error"));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn exit_two_is_timeout() {
    let cancel = CancellationToken::new();
    let err = sh().run("exit 2", TIMEOUT, &cancel).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(exit_code(&err), Some(2));
    assert_eq!(err.context_str(keys::OPERATION), Some(SCRIPT_EXECUTION));
}

#[yare::parameterized(
    three      = { 3 },
    one_twenty = { 127 },
)]
fn other_exit_codes_are_operation_failed(code: i32) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let runner = sh();
    let script = format!("exit {code}");
    let cancel = CancellationToken::new();
    let err = rt
        .block_on(runner.run(&script, TIMEOUT, &cancel))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationFailed);
    assert_eq!(exit_code(&err), Some(i64::from(code)));
}

#[tokio::test]
async fn signal_termination_is_operation_failed() {
    let cancel = CancellationToken::new();
    let err = sh().run("kill -9 $$", TIMEOUT, &cancel).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationFailed);
    assert_eq!(exit_code(&err), None);
}

#[tokio::test]
async fn runner_that_ignores_stdin_is_judged_by_exit_status() {
    let args = vec!["-c".to_string(), "exit 0".to_string()];
    let runner = ProcessRunner::new("/bin/sh", args);
    let script = "x".repeat(1 << 20);
    let cancel = CancellationToken::new();
    assert_eq!(runner.run(&script, TIMEOUT, &cancel).await.unwrap(), "");
}

#[tokio::test]
async fn slow_script_times_out_and_is_killed() {
    let start = Instant::now();
    let cancel = CancellationToken::new();
    let err = sh()
        .run("sleep 30", Duration::from_millis(100), &cancel)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.is_retryable());
    assert!(!is_cancelled(&err));
    assert_eq!(err.context_i64(keys::TIMEOUT_MS), Some(100));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn cancellation_kills_runner() {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let err = sh().run("sleep 30", TIMEOUT, &cancel).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(is_cancelled(&err));
    assert!(start.elapsed() < Duration::from_secs(10));
}

#[tokio::test]
async fn spawn_failure_names_exec_path() {
    let runner = ProcessRunner::new("/nonexistent/maestro-exec", Vec::new());
    let cancel = CancellationToken::new();
    let err = runner.run("return 1", TIMEOUT, &cancel).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OperationFailed);
    assert_eq!(
        err.context_str(keys::EXEC_PATH),
        Some("/nonexistent/maestro-exec")
    );
    assert!(err.cause().is_some());
}

#[test]
fn from_config_resolves_bare_name() {
    let config = ExecutorConfig::default()
        .exec_path("sh")
        .exec_args(vec!["-s".to_string()]);
    let runner = ProcessRunner::from_config(&config);
    assert!(runner.exec_path().is_absolute());
    assert_eq!(runner.exec_args(), ["-s"]);
}

#[test]
fn cancelled_error_is_timeout_wrapping_cancelled() {
    let err = cancelled_error("pause");
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(is_cancelled(&err));
    assert_eq!(err.context_str(keys::OPERATION), Some("pause"));
    assert!(!is_cancelled(&DomainError::new(ErrorKind::Timeout, "slow")));
}

// --- Fake runner ---

#[tokio::test]
async fn fake_consumes_queue_then_fallback() {
    let fake = FakeRunner::new();
    fake.push(FakeOutcome::fail(ErrorKind::PlayerNotAvailable, "not running"))
        .push(FakeOutcome::output("ok"))
        .set_fallback(FakeOutcome::output("fallback"));
    let cancel = CancellationToken::new();

    let err = fake.run("a", TIMEOUT, &cancel).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PlayerNotAvailable);
    assert_eq!(fake.run("b", TIMEOUT, &cancel).await.unwrap(), "ok");
    assert_eq!(fake.run("c", TIMEOUT, &cancel).await.unwrap(), "fallback");
    assert_eq!(fake.scripts(), vec!["a", "b", "c"]);
    assert_eq!(fake.calls()[0].timeout, TIMEOUT);
}

#[tokio::test(start_paused = true)]
async fn fake_hang_times_out() {
    let fake = FakeRunner::new();
    fake.push(FakeOutcome::Hang);
    let cancel = CancellationToken::new();
    let timeout = Duration::from_secs(3);
    let err = fake.run("x", timeout, &cancel).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(!is_cancelled(&err));
}

#[tokio::test]
async fn fake_hang_honours_cancel() {
    let fake = FakeRunner::new();
    fake.push(FakeOutcome::Hang);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let err = fake.run("x", TIMEOUT, &cancel).await.unwrap_err();
    assert!(is_cancelled(&err));
}
