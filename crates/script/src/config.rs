// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor configuration: defaults, environment overrides and TOML files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::template::TemplateStore;

/// Default runner executable, looked up on `PATH`.
pub const DEFAULT_EXEC: &str = "maestro-exec";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

pub const ENV_EXEC_PATH: &str = "MAESTRO_EXEC_PATH";
pub const ENV_EXEC_ARGS: &str = "MAESTRO_EXEC_ARGS";
pub const ENV_TIMEOUT_MS: &str = "MAESTRO_TIMEOUT_MS";
pub const ENV_MAX_RETRIES: &str = "MAESTRO_MAX_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "MAESTRO_RETRY_DELAY_MS";
pub const ENV_SCRIPTS_DIR: &str = "MAESTRO_SCRIPTS_DIR";

/// Errors from loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    fn invalid(key: &str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Immutable executor configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Runner executable. Bare names are resolved on `PATH` by `Executor::new`.
    pub exec_path: PathBuf,
    /// Fixed arguments passed before the script is written to stdin.
    pub exec_args: Vec<String>,
    /// Per-attempt timeout.
    pub timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Fixed delay between attempts.
    pub retry_delay: Duration,
    pub templates: TemplateStore,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            exec_path: PathBuf::from(DEFAULT_EXEC),
            exec_args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            templates: TemplateStore::Builtin,
        }
    }
}

impl ExecutorConfig {
    maestro_core::setters! {
        into { exec_path: PathBuf, templates: TemplateStore }
        set { exec_args: Vec<String>, timeout: Duration, max_retries: u32, retry_delay: Duration }
    }

    /// Defaults overridden by `MAESTRO_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `MAESTRO_*` key.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get(ENV_EXEC_PATH) {
            config.exec_path = PathBuf::from(path.trim());
        }
        if let Some(args) = get(ENV_EXEC_ARGS) {
            config.exec_args = args
                .split_whitespace()
                .map(str::to_string)
                .collect();
        }
        if let Some(ms) = get(ENV_TIMEOUT_MS) {
            config.timeout = parse_timeout(ENV_TIMEOUT_MS, &ms)?;
        }
        if let Some(n) = get(ENV_MAX_RETRIES) {
            config.max_retries = parse_u32(ENV_MAX_RETRIES, &n)?;
        }
        if let Some(ms) = get(ENV_RETRY_DELAY_MS) {
            config.retry_delay = Duration::from_millis(parse_u64(ENV_RETRY_DELAY_MS, &ms)?);
        }
        if let Some(dir) = get(ENV_SCRIPTS_DIR) {
            config.templates = TemplateStore::directory(dir.trim());
        }
        Ok(config)
    }

    /// Parse a TOML config; missing keys keep their defaults.
    ///
    /// ```toml
    /// exec_path = "/usr/local/bin/maestro-exec"
    /// exec_args = []
    /// timeout_ms = 10000
    /// max_retries = 3
    /// retry_delay_ms = 500
    /// scripts_dir = "scripts"
    /// ```
    ///
    /// A relative `scripts_dir` is resolved against `base_dir`.
    pub fn from_toml_str(text: &str, base_dir: &Path) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        let mut config = Self::default();

        if let Some(path) = file.exec_path {
            config.exec_path = path;
        }
        if let Some(args) = file.exec_args {
            config.exec_args = args;
        }
        if let Some(ms) = file.timeout_ms {
            config.timeout = parse_timeout("timeout_ms", &ms.to_string())?;
        }
        if let Some(n) = file.max_retries {
            config.max_retries = n;
        }
        if let Some(ms) = file.retry_delay_ms {
            config.retry_delay = Duration::from_millis(ms);
        }
        if let Some(dir) = file.scripts_dir {
            config.templates = TemplateStore::Directory(base_dir.join(dir));
        }
        Ok(config)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    exec_path: Option<PathBuf>,
    exec_args: Option<Vec<String>>,
    timeout_ms: Option<u64>,
    max_retries: Option<u32>,
    retry_delay_ms: Option<u64>,
    scripts_dir: Option<PathBuf>,
}

fn parse_u64(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::invalid(key, raw, e.to_string()))
}

fn parse_u32(key: &str, raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|e| ConfigError::invalid(key, raw, e.to_string()))
}

fn parse_timeout(key: &str, raw: &str) -> Result<Duration, ConfigError> {
    match parse_u64(key, raw)? {
        0 => Err(ConfigError::invalid(key, raw, "timeout must be positive")),
        ms => Ok(Duration::from_millis(ms)),
    }
}

/// Resolve a bare executable name on `PATH`.
///
/// Paths with a directory component are returned unchanged; an unresolvable
/// bare name is returned as given so the spawn error names it.
pub fn resolve_exec_path(exec: &Path) -> PathBuf {
    if exec.components().count() != 1 || exec.is_absolute() {
        return exec.to_path_buf();
    }
    let Some(path_var) = std::env::var_os("PATH") else {
        return exec.to_path_buf();
    };
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(exec))
        .find(|candidate| candidate.is_file())
        .unwrap_or_else(|| exec.to_path_buf())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
