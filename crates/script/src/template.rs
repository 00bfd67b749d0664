// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named script templates and `{{key}}` interpolation

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use maestro_core::{keys, DomainError, ErrorKind};
use regex::Regex;

/// Regex pattern for `{{name}}` placeholders
// Allow expect here as the regex is compile-time verified to be valid
#[allow(clippy::expect_used)]
pub static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static PARAM_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static TEMPLATE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("constant regex pattern is valid"));

/// File extension of templates stored in a directory.
pub const TEMPLATE_EXTENSION: &str = "applescript";

macro_rules! builtin_templates {
    ($($name:literal),+ $(,)?) => {
        &[$(($name, include_str!(concat!("../scripts/", $name, ".applescript")))),+]
    };
}

static BUILTIN: &[(&str, &str)] = builtin_templates![
    "play_track",
    "pause",
    "stop",
    "resume",
    "next_track",
    "previous_track",
    "seek",
    "set_volume",
    "set_shuffle",
    "set_repeat",
    "player_state",
    "current_track",
    "health_check",
];

/// Where named templates are loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TemplateStore {
    /// Templates compiled into the binary.
    #[default]
    Builtin,
    /// One `{name}.applescript` file per template.
    Directory(PathBuf),
}

impl TemplateStore {
    pub fn directory(path: impl Into<PathBuf>) -> Self {
        TemplateStore::Directory(path.into())
    }

    /// Names of the templates compiled into the binary.
    pub fn builtin_names() -> impl Iterator<Item = &'static str> {
        BUILTIN.iter().map(|(name, _)| *name)
    }

    /// Load the raw template text for `name`.
    ///
    /// Names are restricted to `[A-Za-z0-9_-]` so a name can never escape the
    /// template directory.
    pub async fn load(&self, name: &str) -> Result<String, DomainError> {
        validate_name(name)?;
        match self {
            TemplateStore::Builtin => BUILTIN
                .iter()
                .find(|(builtin, _)| *builtin == name)
                .map(|(_, text)| (*text).to_string())
                .ok_or_else(|| not_found(name)),
            TemplateStore::Directory(dir) => load_file(dir, name).await,
        }
    }
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    if TEMPLATE_NAME.is_match(name) {
        return Ok(());
    }
    let message = format!("invalid template name {name:?}");
    let err = DomainError::new(ErrorKind::InvalidOperation, message);
    Err(err.with_context(keys::TEMPLATE, name))
}

fn not_found(name: &str) -> DomainError {
    let message = format!("template '{name}' not found");
    DomainError::new(ErrorKind::OperationFailed, message).with_context(keys::TEMPLATE, name)
}

async fn load_file(dir: &Path, name: &str) -> Result<String, DomainError> {
    let path = dir.join(format!("{name}.{TEMPLATE_EXTENSION}"));
    match tokio::fs::read_to_string(&path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(not_found(name).with_source(e)),
        Err(e) => {
            let message = format!("failed to read template '{name}' from {}", path.display());
            let err = DomainError::new(ErrorKind::OperationFailed, message);
            Err(err.with_source(e).with_context(keys::TEMPLATE, name))
        }
    }
}

/// Template parameters, rendered to text on insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateParams {
    values: BTreeMap<String, String>,
}

impl TemplateParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`, replacing any previous value.
    ///
    /// Keys must match `[A-Za-z_][A-Za-z0-9_]*`, the same shape the
    /// placeholder pattern accepts.
    pub fn insert(&mut self, key: &str, value: impl fmt::Display) -> Result<(), DomainError> {
        if !PARAM_KEY.is_match(key) {
            let message = format!("invalid template parameter name {key:?}");
            let err = DomainError::new(ErrorKind::InvalidOperation, message);
            return Err(err.with_context(keys::PARAMETER, key));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// Chaining form of [`insert`](Self::insert).
    pub fn with(mut self, key: &str, value: impl fmt::Display) -> Result<Self, DomainError> {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Escape a value for use inside an AppleScript double-quoted string literal.
pub fn escape_applescript_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Replace `{{name}}` placeholders with parameter values.
///
/// Unknown placeholders are left as-is.
pub fn render(template: &str, params: &TemplateParams) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(template, |caps: &regex::Captures| match params.get(&caps[1]) {
            Some(val) => val.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
