// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! maestro-exec: runs one script from stdin through the platform interpreter
//! and reports through its exit status (0 success, 1 failure, 2 timeout).

mod cli;
mod exit_error;
mod run;

use std::io::Write;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::exit_error::ExitError;

/// Log filter variable. Logging is off by default so stderr carries only
/// the failure message.
const LOG_ENV: &str = "MAESTRO_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    if let Err(e) = run(&cli).await {
        tracing::debug!(code = e.code, error = %e, "script failed");
        if !e.message.is_empty() {
            eprintln!("{}", e.message);
        }
        std::process::exit(e.code);
    }
}

async fn run(cli: &Cli) -> Result<(), ExitError> {
    let script = run::read_script(tokio::io::stdin()).await?;
    let output = run::run_script(&cli.interpreter, &script, cli.timeout()).await?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(&output)
        .and_then(|()| stdout.flush())
        .map_err(|e| ExitError::failure(format!("failed to write output: {e}")))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
