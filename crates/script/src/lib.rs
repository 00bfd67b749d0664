// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! maestro-script: isolated script execution with timeout and retry, script
//! templates and the Music app player adapter

pub mod config;
pub mod executor;
pub mod player;
pub mod runner;
pub mod template;

pub use config::{ConfigError, ExecutorConfig};
pub use executor::{ExecutionResult, Executor};
pub use player::{AppleScriptPlayer, PlayerControl};
pub use runner::{
    cancelled_error, exit_codes, is_cancelled, spawn_piped, write_stdin_and_wait, Cancelled,
    ProcessRunner, ScriptRunner, SCRIPT_EXECUTION,
};
#[cfg(any(test, feature = "test-support"))]
pub use runner::{FakeOutcome, FakeRunner, RunCall};
pub use template::{escape_applescript_string, render, TemplateParams, TemplateStore};
