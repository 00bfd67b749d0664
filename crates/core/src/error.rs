// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain error taxonomy.
//!
//! Every failure in maestro is reported as a [`DomainError`]: an [`ErrorKind`]
//! from a closed set, a human message, an optional underlying cause and an
//! open key/value context map. Each kind belongs to exactly one [`Category`],
//! and the category decides whether the retry controller may try again
//! (retryable) or must stop immediately (permanent).

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::values::{PlaylistId, TrackId};

/// Boxed, thread-safe error used as the cause of a [`DomainError`].
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Well-known context keys attached by the pre-built constructors and by the
/// execution layer. Tests assert on these rather than on message text.
pub mod keys {
    /// Track identifier (`track_not_found`).
    pub const TRACK_ID: &str = "track_id";
    /// Playlist identifier (`playlist_not_found`).
    pub const PLAYLIST_ID: &str = "playlist_id";
    /// Attempted volume level (`invalid_volume`).
    pub const VOLUME: &str = "volume";
    /// Attempted position in whole seconds (`invalid_position`).
    pub const POSITION_SECONDS: &str = "position_seconds";
    /// Operation name (`operation_timeout`, player adapter failures).
    pub const OPERATION: &str = "operation";
    /// Timeout length in milliseconds (`operation_timeout`).
    pub const TIMEOUT_MS: &str = "timeout_ms";
    /// Number of attempts made before retries were exhausted.
    pub const ATTEMPTS: &str = "attempts";
    /// Exit code of the script runner process.
    pub const EXIT_CODE: &str = "exit_code";
    /// Trimmed standard error of the script runner process.
    pub const STDERR: &str = "stderr";
    /// Resolved path of the script runner executable.
    pub const EXEC_PATH: &str = "exec_path";
    /// Script template name.
    pub const TEMPLATE: &str = "template";
    /// Template parameter name.
    pub const PARAMETER: &str = "parameter";
    /// Expected field count of a decoded line (`decode_shape`).
    pub const EXPECTED_FIELDS: &str = "expected_fields";
    /// Actual field count of a decoded line (`decode_shape`).
    pub const ACTUAL_FIELDS: &str = "actual_fields";
    /// Name of the field that failed to decode (`decode_field`).
    pub const FIELD: &str = "field";
    /// Raw text of the field that failed to decode (`decode_field`).
    pub const RAW_VALUE: &str = "raw_value";
}

/// Failure category. Drives retry classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    NotFound,
    InvalidInput,
    Unavailable,
    ReadOnly,
    Timeout,
    PermissionDenied,
    OperationFailed,
    Conflict,
}

crate::simple_display! {
    Category {
        NotFound => "not-found",
        InvalidInput => "invalid-input",
        Unavailable => "unavailable",
        ReadOnly => "read-only",
        Timeout => "timeout",
        PermissionDenied => "permission-denied",
        OperationFailed => "operation-failed",
        Conflict => "conflict",
    }
}

impl Category {
    /// Re-attempting the same operation could plausibly succeed.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Category::Unavailable | Category::Timeout | Category::OperationFailed
        )
    }

    /// Re-attempting the same operation can never succeed.
    pub fn is_permanent(self) -> bool {
        matches!(
            self,
            Category::InvalidInput | Category::PermissionDenied | Category::ReadOnly
        )
    }
}

/// Domain area an [`ErrorKind`] belongs to, for membership queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorGroup {
    Track,
    Playlist,
    Player,
    Queue,
    Library,
    General,
}

/// Closed set of failure kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    // Track
    TrackNotFound,
    InvalidTrackId,
    InvalidTrack,

    // Playlist
    PlaylistNotFound,
    InvalidPlaylistId,
    InvalidPlaylist,
    PlaylistReadOnly,
    TrackAlreadyInPlaylist,

    // Player
    PlayerNotAvailable,
    InvalidPlayerState,
    InvalidVolume,
    InvalidPosition,
    InvalidRepeatMode,

    // Queue
    QueueEmpty,
    InvalidQueuePosition,

    // Library
    LibraryNotAvailable,
    SearchFailed,
    InvalidSearchQuery,

    // General
    OperationFailed,
    Timeout,
    PermissionDenied,
    InvalidOperation,
}

crate::simple_display! {
    ErrorKind {
        TrackNotFound => "track not found",
        InvalidTrackId => "invalid track ID",
        InvalidTrack => "invalid track",
        PlaylistNotFound => "playlist not found",
        InvalidPlaylistId => "invalid playlist ID",
        InvalidPlaylist => "invalid playlist",
        PlaylistReadOnly => "playlist is read-only",
        TrackAlreadyInPlaylist => "track already in playlist",
        PlayerNotAvailable => "player not available",
        InvalidPlayerState => "invalid player state",
        InvalidVolume => "invalid volume",
        InvalidPosition => "invalid position",
        InvalidRepeatMode => "invalid repeat mode",
        QueueEmpty => "queue is empty",
        InvalidQueuePosition => "invalid queue position",
        LibraryNotAvailable => "library not available",
        SearchFailed => "search failed",
        InvalidSearchQuery => "invalid search query",
        OperationFailed => "operation failed",
        Timeout => "operation timed out",
        PermissionDenied => "permission denied",
        InvalidOperation => "invalid operation",
    }
}

impl ErrorKind {
    pub fn category(self) -> Category {
        use ErrorKind::*;
        match self {
            TrackNotFound | PlaylistNotFound | QueueEmpty => Category::NotFound,
            InvalidTrackId
            | InvalidTrack
            | InvalidPlaylistId
            | InvalidPlaylist
            | InvalidPlayerState
            | InvalidVolume
            | InvalidPosition
            | InvalidRepeatMode
            | InvalidQueuePosition
            | InvalidSearchQuery
            | InvalidOperation => Category::InvalidInput,
            PlaylistReadOnly => Category::ReadOnly,
            TrackAlreadyInPlaylist => Category::Conflict,
            PlayerNotAvailable | LibraryNotAvailable => Category::Unavailable,
            OperationFailed | SearchFailed => Category::OperationFailed,
            Timeout => Category::Timeout,
            PermissionDenied => Category::PermissionDenied,
        }
    }

    pub fn group(self) -> ErrorGroup {
        use ErrorKind::*;
        match self {
            TrackNotFound | InvalidTrackId | InvalidTrack => ErrorGroup::Track,
            PlaylistNotFound
            | InvalidPlaylistId
            | InvalidPlaylist
            | PlaylistReadOnly
            | TrackAlreadyInPlaylist => ErrorGroup::Playlist,
            PlayerNotAvailable
            | InvalidPlayerState
            | InvalidVolume
            | InvalidPosition
            | InvalidRepeatMode => ErrorGroup::Player,
            QueueEmpty | InvalidQueuePosition => ErrorGroup::Queue,
            LibraryNotAvailable | SearchFailed | InvalidSearchQuery => ErrorGroup::Library,
            OperationFailed | Timeout | PermissionDenied | InvalidOperation => ErrorGroup::General,
        }
    }

    pub fn is_retryable(self) -> bool {
        self.category().is_retryable()
    }

    pub fn is_permanent(self) -> bool {
        self.category().is_permanent()
    }
}

/// Value stored in a [`DomainError`] context map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContextValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ContextValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ContextValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ContextValue::Int(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextValue::Text(s) => f.write_str(s),
            ContextValue::Int(n) => write!(f, "{n}"),
            ContextValue::Float(x) => write!(f, "{x}"),
            ContextValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        ContextValue::Text(s.to_string())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        ContextValue::Text(s)
    }
}

impl From<&String> for ContextValue {
    fn from(s: &String) -> Self {
        ContextValue::Text(s.clone())
    }
}

impl From<i64> for ContextValue {
    fn from(n: i64) -> Self {
        ContextValue::Int(n)
    }
}

impl From<i32> for ContextValue {
    fn from(n: i32) -> Self {
        ContextValue::Int(n.into())
    }
}

impl From<u32> for ContextValue {
    fn from(n: u32) -> Self {
        ContextValue::Int(n.into())
    }
}

impl From<u64> for ContextValue {
    fn from(n: u64) -> Self {
        ContextValue::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<usize> for ContextValue {
    fn from(n: usize) -> Self {
        ContextValue::Int(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<f64> for ContextValue {
    fn from(x: f64) -> Self {
        ContextValue::Float(x)
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        ContextValue::Bool(b)
    }
}

/// Classified failure with message, optional cause and diagnostic context.
#[derive(Debug, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct DomainError {
    kind: ErrorKind,
    message: String,
    #[source]
    source: Option<BoxError>,
    context: BTreeMap<String, ContextValue>,
}

impl DomainError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            context: BTreeMap::new(),
        }
    }

    /// Attach the underlying cause.
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Attach a context entry, replacing any previous value for `key`.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<ContextValue>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn context(&self, key: &str) -> Option<&ContextValue> {
        self.context.get(key)
    }

    pub fn context_str(&self, key: &str) -> Option<&str> {
        self.context(key).and_then(ContextValue::as_str)
    }

    pub fn context_i64(&self, key: &str) -> Option<i64> {
        self.context(key).and_then(ContextValue::as_i64)
    }

    pub fn context_map(&self) -> &BTreeMap<String, ContextValue> {
        &self.context
    }

    /// The directly wrapped cause, if any.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.source.as_deref()
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    pub fn is_permanent(&self) -> bool {
        self.kind.is_permanent()
    }

    pub fn is_track_error(&self) -> bool {
        self.kind.group() == ErrorGroup::Track
    }

    pub fn is_playlist_error(&self) -> bool {
        self.kind.group() == ErrorGroup::Playlist
    }

    pub fn is_player_error(&self) -> bool {
        self.kind.group() == ErrorGroup::Player
    }

    pub fn is_queue_error(&self) -> bool {
        self.kind.group() == ErrorGroup::Queue
    }

    pub fn is_library_error(&self) -> bool {
        self.kind.group() == ErrorGroup::Library
    }

    /// True if this error or any domain error in its cause chain has `kind`.
    pub fn has_kind(&self, kind: ErrorKind) -> bool {
        let mut current: Option<&(dyn Error + 'static)> = Some(self);
        while let Some(err) = current {
            let found = err.downcast_ref::<DomainError>().map(|d| d.kind);
            if found == Some(kind) {
                return true;
            }
            current = err.source();
        }
        false
    }

    /// Render this error and every cause as `outer: caused by inner`.
    pub fn display_chain(&self) -> String {
        let mut out = self.to_string();
        let mut current = self.source();
        while let Some(err) = current {
            out.push_str(" (caused by: ");
            out.push_str(&err.to_string());
            out.push(')');
            current = err.source();
        }
        out
    }

    // --- Pre-built constructors -------------------------------------------

    pub fn track_not_found(track_id: &TrackId) -> Self {
        Self::new(
            ErrorKind::TrackNotFound,
            format!("track with ID '{track_id}' was not found"),
        )
        .with_context(keys::TRACK_ID, track_id.as_str())
    }

    pub fn playlist_not_found(playlist_id: &PlaylistId) -> Self {
        Self::new(
            ErrorKind::PlaylistNotFound,
            format!("playlist with ID '{playlist_id}' was not found"),
        )
        .with_context(keys::PLAYLIST_ID, playlist_id.as_str())
    }

    pub fn invalid_volume(level: i64) -> Self {
        Self::new(
            ErrorKind::InvalidVolume,
            format!("volume {level} is invalid (must be 0-100)"),
        )
        .with_context(keys::VOLUME, level)
    }

    pub fn invalid_position(seconds: i64) -> Self {
        Self::new(
            ErrorKind::InvalidPosition,
            format!("position {seconds}s is invalid"),
        )
        .with_context(keys::POSITION_SECONDS, seconds)
    }

    pub fn operation_timeout(operation: &str, timeout: Duration) -> Self {
        let after = format_timeout(timeout);
        let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        Self::new(
            ErrorKind::Timeout,
            format!("operation '{operation}' timed out after {after}"),
        )
        .with_context(keys::OPERATION, operation)
        .with_context(keys::TIMEOUT_MS, timeout_ms)
    }

    /// A delimited line had the wrong number of fields.
    pub fn decode_shape(what: &str, expected: usize, actual: usize) -> Self {
        Self::new(
            ErrorKind::OperationFailed,
            format!("invalid {what} format: expected {expected} fields, got {actual}"),
        )
        .with_context(keys::EXPECTED_FIELDS, expected)
        .with_context(keys::ACTUAL_FIELDS, actual)
    }

    /// A single field of a delimited line could not be decoded.
    pub fn decode_field(what: &str, field: &str, raw: &str) -> Self {
        Self::new(
            ErrorKind::OperationFailed,
            format!("invalid {what} {field} format: {raw:?}"),
        )
        .with_context(keys::FIELD, field)
        .with_context(keys::RAW_VALUE, raw)
    }
}

/// Timeout for messages: whole seconds as `10s`, anything finer as `2500ms`.
pub fn format_timeout(timeout: Duration) -> String {
    if timeout.subsec_millis() == 0 {
        format!("{}s", timeout.as_secs())
    } else {
        format!("{}ms", timeout.as_millis())
    }
}

/// First [`DomainError`] in the chain starting at `err` (inclusive).
pub fn find_domain_error<'a>(err: &'a (dyn Error + 'static)) -> Option<&'a DomainError> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(domain) = e.downcast_ref::<DomainError>() {
            return Some(domain);
        }
        current = e.source();
    }
    None
}

/// Classify an arbitrary error. Errors with no domain error in their chain
/// are neither retryable nor permanent.
pub fn is_retryable(err: &(dyn Error + 'static)) -> bool {
    find_domain_error(err).is_some_and(DomainError::is_retryable)
}

/// See [`is_retryable`].
pub fn is_permanent(err: &(dyn Error + 'static)) -> bool {
    find_domain_error(err).is_some_and(DomainError::is_permanent)
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
