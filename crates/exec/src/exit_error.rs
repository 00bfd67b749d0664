// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Custom error type that carries a process exit code.
//!
//! The run path returns `ExitError` instead of calling `std::process::exit()`
//! directly, allowing `main()` to handle process termination. Codes follow the
//! runner protocol: `1` failure, `2` timeout.

use std::fmt;

use maestro_script::exit_codes;

#[derive(Debug)]
pub struct ExitError {
    pub code: i32,
    pub message: String,
}

impl ExitError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(exit_codes::FAILURE, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(exit_codes::TIMEOUT, message)
    }
}

impl fmt::Display for ExitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ExitError {}
