// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Script execution with timeout, bounded retry and cancellation.

use std::time::Duration;

use maestro_core::{keys, DomainError, ErrorKind};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::config::ExecutorConfig;
use crate::runner::{cancelled_error, is_cancelled, ProcessRunner, ScriptRunner, SCRIPT_EXECUTION};
use crate::template::{render, TemplateParams};

/// Script run by [`Executor::is_executable_available`].
const CHECK_SCRIPT: &str = r#"return "test""#;
const CHECK_OUTPUT: &str = "test";
const CHECK_TIMEOUT: Duration = Duration::from_secs(2);
const CHECK_BUDGET: Duration = Duration::from_secs(5);

const HEALTH_SCRIPT: &str = r#"return "health""#;
const HEALTH_OUTPUT: &str = "health";

/// Outcome of one [`Executor`] request.
#[derive(Debug)]
pub struct ExecutionResult {
    /// Trimmed output on success, classified error otherwise.
    pub outcome: Result<String, DomainError>,
    pub elapsed: Duration,
    /// Attempts actually made; 0 when rejected before spawning.
    pub attempts: u32,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn output(&self) -> Option<&str> {
        self.outcome.as_deref().ok()
    }

    pub fn error(&self) -> Option<&DomainError> {
        self.outcome.as_ref().err()
    }

    pub fn into_result(self) -> Result<String, DomainError> {
        self.outcome
    }
}

/// Runs scripts through a [`ScriptRunner`] with the retry policy from
/// [`ExecutorConfig`].
///
/// Holds only immutable state, so one executor can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Executor<R = ProcessRunner> {
    config: ExecutorConfig,
    runner: R,
}

impl Executor<ProcessRunner> {
    /// Executor over the configured runner executable.
    pub fn new(config: ExecutorConfig) -> Self {
        let runner = ProcessRunner::from_config(&config);
        tracing::debug!(exec_path = %runner.exec_path().display(), "script runner resolved");
        Self { config, runner }
    }
}

impl<R: ScriptRunner> Executor<R> {
    pub fn with_runner(config: ExecutorConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run `script` with the configured timeout.
    pub async fn execute(&self, script: &str, cancel: &CancellationToken) -> ExecutionResult {
        self.execute_with_timeout(script, self.config.timeout, cancel)
            .await
    }

    /// Run `script` with a per-attempt `timeout`.
    ///
    /// Attempts repeat until success, a permanent error, cancellation, or
    /// `max_retries + 1` attempts, waiting `retry_delay` between attempts.
    pub async fn execute_with_timeout(
        &self,
        script: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        let span = tracing::info_span!(
            "script.execute",
            timeout_ms = timeout.as_millis() as u64,
            attempts = tracing::field::Empty,
        );
        let start = Instant::now();
        let (outcome, attempts) = self
            .retry_loop(script, timeout, cancel)
            .instrument(span.clone())
            .await;
        span.record("attempts", attempts);

        let elapsed = start.elapsed();
        let elapsed_ms = elapsed.as_millis() as u64;
        match &outcome {
            Ok(_) => tracing::info!(parent: &span, attempts, elapsed_ms, "script succeeded"),
            Err(e) => {
                tracing::warn!(parent: &span, attempts, elapsed_ms, error = %e, "script failed")
            }
        }
        ExecutionResult {
            outcome,
            elapsed,
            attempts,
        }
    }

    async fn retry_loop(
        &self,
        script: &str,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> (Result<String, DomainError>, u32) {
        if script.trim().is_empty() {
            let err = DomainError::new(ErrorKind::InvalidOperation, "script cannot be empty");
            return (Err(err), 0);
        }

        let max_attempts = self.config.max_retries.saturating_add(1);
        let retry_delay = self.config.retry_delay;
        let mut attempts = 0;

        loop {
            if cancel.is_cancelled() {
                return (Err(cancelled_error(SCRIPT_EXECUTION)), attempts);
            }

            attempts += 1;
            tracing::debug!(attempt = attempts, max_attempts, "running script");

            let err = match self.runner.run(script, timeout, cancel).await {
                Ok(output) => return (Ok(output), attempts),
                Err(e) => e,
            };

            if is_cancelled(&err) {
                return (Err(err), attempts);
            }
            if err.is_permanent() {
                tracing::debug!(attempt = attempts, error = %err, "permanent error, not retrying");
                return (Err(err), attempts);
            }
            if attempts >= max_attempts {
                return (Err(exhausted(attempts, err)), attempts);
            }

            tracing::warn!(
                attempt = attempts,
                max_attempts,
                delay_ms = retry_delay.as_millis() as u64,
                error = %err,
                "script attempt failed, retrying",
            );
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    return (Err(cancelled_error(SCRIPT_EXECUTION)), attempts);
                }
                _ = tokio::time::sleep(retry_delay) => {}
            }
        }
    }

    /// Load template `name`, substitute `params` and execute the result.
    ///
    /// Template errors are reported with zero attempts.
    pub async fn execute_template(
        &self,
        name: &str,
        params: &TemplateParams,
        cancel: &CancellationToken,
    ) -> ExecutionResult {
        let start = Instant::now();
        let template = match self.config.templates.load(name).await {
            Ok(template) => template,
            Err(e) => {
                tracing::warn!(template = name, error = %e, "failed to load script template");
                return ExecutionResult {
                    outcome: Err(e),
                    elapsed: start.elapsed(),
                    attempts: 0,
                };
            }
        };

        let script = render(&template, params);
        let mut result = self.execute(&script, cancel).await;
        result.elapsed = start.elapsed();
        result.outcome = result
            .outcome
            .map_err(|e| e.with_context(keys::TEMPLATE, name.to_string()));
        result
    }

    /// Check that the runner can execute scripts at all.
    ///
    /// One direct attempt, no retries, bounded by a short timeout.
    pub async fn is_executable_available(&self) -> Result<(), DomainError> {
        let cancel = CancellationToken::new();
        let check = self.runner.run(CHECK_SCRIPT, CHECK_TIMEOUT, &cancel);
        let output = match tokio::time::timeout(CHECK_BUDGET, check).await {
            Ok(result) => result,
            Err(_) => Err(DomainError::operation_timeout("availability check", CHECK_BUDGET)),
        };
        let output = output.map_err(|e| {
            DomainError::new(ErrorKind::OperationFailed, "script runner is not working")
                .with_source(e)
        })?;

        if output != CHECK_OUTPUT {
            return Err(DomainError::new(
                ErrorKind::OperationFailed,
                format!("unexpected availability check output {output:?}"),
            ));
        }
        Ok(())
    }

    /// Run a trivial script through the full retry path.
    pub async fn health_check(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        let output = self.execute(HEALTH_SCRIPT, cancel).await.into_result()?;
        if output != HEALTH_OUTPUT {
            return Err(DomainError::new(
                ErrorKind::OperationFailed,
                format!("unexpected health check output {output:?}"),
            ));
        }
        Ok(())
    }
}

fn exhausted(attempts: u32, last: DomainError) -> DomainError {
    DomainError::new(
        ErrorKind::OperationFailed,
        format!("script execution failed after {attempts} attempts"),
    )
    .with_context(keys::ATTEMPTS, attempts)
    .with_source(last)
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
