// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Interpreter invocation with a hard timeout.

use std::path::Path;
use std::time::{Duration, Instant};

use maestro_core::format_timeout;
use maestro_script::{spawn_piped, write_stdin_and_wait};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::exit_error::ExitError;

/// Read the whole script from `input`.
pub async fn read_script(mut input: impl AsyncRead + Unpin) -> Result<String, ExitError> {
    let mut script = String::new();
    input
        .read_to_string(&mut script)
        .await
        .map_err(|e| ExitError::failure(format!("failed to read script from stdin: {e}")))?;
    Ok(script)
}

/// Run `script` through `interpreter`, returning its stdout verbatim.
///
/// Any non-zero interpreter exit is a failure; the timeout code is reserved
/// for this process killing the interpreter.
pub async fn run_script(
    interpreter: &Path,
    script: &str,
    timeout: Duration,
) -> Result<Vec<u8>, ExitError> {
    let script = script.trim();
    if script.is_empty() {
        return Err(ExitError::failure("no script provided on stdin"));
    }

    let span = tracing::info_span!(
        "exec.interpreter",
        interpreter = %interpreter.display(),
        exit_code = tracing::field::Empty,
        duration_ms = tracing::field::Empty,
    );
    let start = Instant::now();

    let mut command = Command::new(interpreter);
    let child = spawn_piped(&mut command).map_err(|e| {
        ExitError::failure(format!("failed to start {}: {e}", interpreter.display()))
    })?;
    let io = write_stdin_and_wait(child, script);

    let output = match tokio::time::timeout(timeout, io).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(ExitError::failure(format!("{} I/O failed: {e}", interpreter.display())));
        }
        Err(_) => {
            tracing::debug!(parent: &span, "interpreter timed out, killed");
            return Err(ExitError::timeout(format!(
                "script execution timed out after {}",
                format_timeout(timeout)
            )));
        }
    };

    span.record("exit_code", output.status.code().unwrap_or(-1));
    span.record("duration_ms", start.elapsed().as_millis() as u64);

    if output.status.success() {
        return Ok(output.stdout);
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let message = match (stderr.is_empty(), output.status.code()) {
        (false, _) => stderr,
        (true, Some(code)) => format!("{} exited with code {code}", interpreter.display()),
        (true, None) => format!("{} was terminated by a signal", interpreter.display()),
    };
    Err(ExitError::failure(message))
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
