// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_INTERPRETER: &str = "osascript";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Read a script from stdin and run it with a hard timeout.
///
/// Exit status: 0 success, 1 script failure, 2 timeout.
#[derive(Debug, Clone, Parser)]
#[command(name = "maestro-exec", version)]
pub struct Cli {
    /// Interpreter that reads the program from its stdin
    #[arg(long, env = "MAESTRO_INTERPRETER", default_value = DEFAULT_INTERPRETER)]
    pub interpreter: PathBuf,

    /// Kill the interpreter after this many milliseconds
    #[arg(
        long = "timeout-ms",
        env = "MAESTRO_EXEC_TIMEOUT_MS",
        default_value_t = DEFAULT_TIMEOUT_MS,
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub timeout_ms: u64,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
