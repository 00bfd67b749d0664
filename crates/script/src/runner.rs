// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-attempt script execution in an isolated runner process.
//!
//! Every call spawns one short-lived process, writes the script to its stdin,
//! closes stdin and waits for exit. The runner reports through its exit code:
//! `0` success, `1` script failure, `2` interpreter timeout. The process is
//! killed when the per-attempt timeout elapses or the caller cancels.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use maestro_core::{keys, DomainError, ErrorKind};
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::{resolve_exec_path, ExecutorConfig};

/// Runner exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
    pub const TIMEOUT: i32 = 2;
}

/// Operation name used in timeout and cancellation errors.
pub const SCRIPT_EXECUTION: &str = "script execution";

/// Cause attached to errors produced by caller cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("execution cancelled")]
pub struct Cancelled;

/// Timeout-category error wrapping [`Cancelled`].
pub fn cancelled_error(operation: &str) -> DomainError {
    let message = format!("operation '{operation}' was cancelled");
    DomainError::new(ErrorKind::Timeout, message)
        .with_source(Cancelled)
        .with_context(keys::OPERATION, operation)
}

/// True if `err` or any of its causes is [`Cancelled`].
pub fn is_cancelled(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<Cancelled>() {
            return true;
        }
        current = e.source();
    }
    false
}

/// Runs one attempt of a script
#[async_trait]
pub trait ScriptRunner: Send + Sync + 'static {
    /// Run `script` once, returning trimmed stdout on success.
    ///
    /// Never retries. Must honour `timeout` and `cancel`.
    async fn run(
        &self,
        script: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, DomainError>;
}

/// Runs scripts through an external runner executable.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    exec_path: PathBuf,
    exec_args: Vec<String>,
}

impl ProcessRunner {
    pub fn new(exec_path: impl Into<PathBuf>, exec_args: Vec<String>) -> Self {
        Self {
            exec_path: exec_path.into(),
            exec_args,
        }
    }

    /// Build from config, resolving a bare executable name on `PATH`.
    pub fn from_config(config: &ExecutorConfig) -> Self {
        let exec_path = resolve_exec_path(&config.exec_path);
        Self::new(exec_path, config.exec_args.clone())
    }

    pub fn exec_path(&self) -> &Path {
        &self.exec_path
    }

    pub fn exec_args(&self) -> &[String] {
        &self.exec_args
    }

    fn io_error(&self, message: &str, source: std::io::Error) -> DomainError {
        DomainError::new(ErrorKind::OperationFailed, format!("{message}: {source}"))
            .with_source(source)
            .with_context(keys::EXEC_PATH, self.exec_path.display().to_string())
    }
}

#[async_trait]
impl ScriptRunner for ProcessRunner {
    async fn run(
        &self,
        script: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, DomainError> {
        let span = tracing::info_span!(
            "script.exec",
            exec_path = %self.exec_path.display(),
            exit_code = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        );
        self.run_process(script, timeout, cancel)
            .instrument(span)
            .await
    }
}

impl ProcessRunner {
    async fn run_process(
        &self,
        script: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<String, DomainError> {
        let start = Instant::now();

        let mut command = Command::new(&self.exec_path);
        command.args(&self.exec_args);
        let child = spawn_piped(&mut command)
            .map_err(|e| self.io_error("failed to spawn script runner", e))?;
        let io = write_stdin_and_wait(child, script);

        // Dropping `io` drops the child, which kills it.
        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("script cancelled, runner killed");
                return Err(cancelled_error(SCRIPT_EXECUTION));
            }
            result = tokio::time::timeout(timeout, io) => match result {
                Err(_) => {
                    tracing::debug!(
                        timeout_ms = timeout.as_millis() as u64,
                        "script timed out, runner killed"
                    );
                    return Err(DomainError::operation_timeout(SCRIPT_EXECUTION, timeout));
                }
                Ok(Err(e)) => return Err(self.io_error("script runner I/O failed", e)),
                Ok(Ok(output)) => output,
            },
        };

        let span = tracing::Span::current();
        span.record("exit_code", output.status.code().unwrap_or(-1));
        span.record("duration_ms", start.elapsed().as_millis() as u64);

        classify(output, timeout)
    }
}

/// Spawn `command` with all three stdio streams piped. The child is killed
/// when dropped.
pub fn spawn_piped(command: &mut Command) -> std::io::Result<Child> {
    command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
}

/// Write `script` to the child's stdin, close it and collect the output.
///
/// A child that exits without reading is judged by its exit status, so a
/// broken pipe on the write is not an error.
pub async fn write_stdin_and_wait(mut child: Child, script: &str) -> std::io::Result<Output> {
    if let Some(mut stdin) = child.stdin.take() {
        let write_result = stdin.write_all(script.as_bytes()).await;
        drop(stdin); // close pipe to signal EOF
        if let Err(e) = write_result {
            if e.kind() != std::io::ErrorKind::BrokenPipe {
                return Err(e);
            }
        }
    }
    child.wait_with_output().await
}

/// Map a finished runner process to its output or a classified error.
fn classify(output: Output, timeout: Duration) -> Result<String, DomainError> {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let Some(code) = output.status.code() else {
        let message = "script runner was terminated by a signal";
        let err = DomainError::new(ErrorKind::OperationFailed, message);
        return Err(err.with_context(keys::STDERR, stderr));
    };
    let err = match code {
        exit_codes::SUCCESS => {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }
        exit_codes::TIMEOUT => DomainError::operation_timeout(SCRIPT_EXECUTION, timeout),
        exit_codes::FAILURE if stderr.is_empty() => {
            DomainError::new(ErrorKind::OperationFailed, "script execution failed")
        }
        exit_codes::FAILURE => DomainError::new(
            ErrorKind::OperationFailed,
            format!("script execution failed: {stderr}"),
        ),
        other => DomainError::new(
            ErrorKind::OperationFailed,
            format!("script runner exited with code {other}"),
        ),
    };
    let err = err
        .with_context(keys::EXIT_CODE, code)
        .with_context(keys::STDERR, stderr);
    Err(err)
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{cancelled_error, ScriptRunner, SCRIPT_EXECUTION};
    use async_trait::async_trait;
    use maestro_core::{DomainError, ErrorKind};
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    /// Scripted outcome of one fake attempt
    #[derive(Debug, Clone, PartialEq)]
    pub enum FakeOutcome {
        Output(String),
        Fail(ErrorKind, String),
        /// Block until the timeout elapses or the caller cancels.
        Hang,
    }

    impl FakeOutcome {
        pub fn output(text: impl Into<String>) -> Self {
            FakeOutcome::Output(text.into())
        }

        pub fn fail(kind: ErrorKind, message: impl Into<String>) -> Self {
            FakeOutcome::Fail(kind, message.into())
        }
    }

    /// Recorded attempt
    #[derive(Debug, Clone)]
    pub struct RunCall {
        pub script: String,
        pub timeout: Duration,
    }

    struct FakeRunnerState {
        queued: VecDeque<FakeOutcome>,
        fallback: FakeOutcome,
        calls: Vec<RunCall>,
    }

    /// Fake runner for testing.
    ///
    /// Queued outcomes are consumed in order; once the queue is empty every
    /// attempt gets the fallback outcome (empty output by default).
    #[derive(Clone)]
    pub struct FakeRunner {
        inner: Arc<Mutex<FakeRunnerState>>,
    }

    impl Default for FakeRunner {
        fn default() -> Self {
            Self {
                inner: Arc::new(Mutex::new(FakeRunnerState {
                    queued: VecDeque::new(),
                    fallback: FakeOutcome::Output(String::new()),
                    calls: Vec::new(),
                })),
            }
        }
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue outcomes for the next attempts
        pub fn push(&self, outcome: FakeOutcome) -> &Self {
            self.inner.lock().queued.push_back(outcome);
            self
        }

        /// Outcome once the queue is drained
        pub fn set_fallback(&self, outcome: FakeOutcome) -> &Self {
            self.inner.lock().fallback = outcome;
            self
        }

        /// Get all recorded attempts
        pub fn calls(&self) -> Vec<RunCall> {
            self.inner.lock().calls.clone()
        }

        pub fn scripts(&self) -> Vec<String> {
            self.inner
                .lock()
                .calls
                .iter()
                .map(|c| c.script.clone())
                .collect()
        }

        pub fn call_count(&self) -> usize {
            self.inner.lock().calls.len()
        }
    }

    #[async_trait]
    impl ScriptRunner for FakeRunner {
        async fn run(
            &self,
            script: &str,
            timeout: Duration,
            cancel: &CancellationToken,
        ) -> Result<String, DomainError> {
            let outcome = {
                let mut state = self.inner.lock();
                state.calls.push(RunCall {
                    script: script.to_string(),
                    timeout,
                });
                match state.queued.pop_front() {
                    Some(outcome) => outcome,
                    None => state.fallback.clone(),
                }
            };
            match outcome {
                FakeOutcome::Output(text) => Ok(text),
                FakeOutcome::Fail(kind, message) => Err(DomainError::new(kind, message)),
                FakeOutcome::Hang => tokio::select! {
                    _ = cancel.cancelled() => Err(cancelled_error(SCRIPT_EXECUTION)),
                    _ = tokio::time::sleep(timeout) => {
                        Err(DomainError::operation_timeout(SCRIPT_EXECUTION, timeout))
                    }
                },
            }
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeOutcome, FakeRunner, RunCall};

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
