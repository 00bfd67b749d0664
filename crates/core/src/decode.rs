// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Decoding of delimited script output into domain values.
//!
//! Scripts answer with a single line of `|`-joined positional fields. Field
//! count is checked before any field is interpreted, so a malformed line never
//! yields a partially populated value.
//!
//! Fields may contain the delimiter when it is escaped: producers write `\|`
//! for a literal `|` and `\\` for a literal `\`. A backslash followed by any
//! other character is kept verbatim, so output from producers that do not
//! escape decodes exactly as before.

use crate::entities::{PlayerSnapshot, Track};
use crate::error::DomainError;
use crate::values::{PlayerState, RepeatMode, Seconds, TrackId, Volume};

pub const FIELD_DELIMITER: char = '|';
const ESCAPE: char = '\\';

/// Emitted by the Music app for properties that have no value (e.g. the
/// player position when no track is loaded).
pub const MISSING_VALUE: &str = "missing value";

/// `state|volume|position|shuffle|repeat|track_id`
pub const PLAYER_FIELD_COUNT: usize = 6;

/// `id|title|artist|album|duration`
pub const TRACK_FIELD_COUNT: usize = 5;

const PLAYER_STATE: &str = "player state";
const TRACK: &str = "track";

/// Split trimmed `raw` on unescaped delimiters, resolving escapes.
pub fn split_fields(raw: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = raw.trim().chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.peek() {
                Some(&next) if next == FIELD_DELIMITER || next == ESCAPE => {
                    current.push(next);
                    chars.next();
                }
                _ => current.push(c),
            },
            FIELD_DELIMITER => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Split and require exactly `N` fields.
pub fn split_exact<const N: usize>(raw: &str, what: &str) -> Result<[String; N], DomainError> {
    let fields = split_fields(raw);
    let actual = fields.len();
    fields
        .try_into()
        .map_err(|_: Vec<String>| DomainError::decode_shape(what, N, actual))
}

/// Join fields, escaping delimiters and escape characters.
pub fn encode_fields<S: AsRef<str>>(fields: &[S]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(FIELD_DELIMITER);
        }
        for c in field.as_ref().chars() {
            if c == FIELD_DELIMITER || c == ESCAPE {
                out.push(ESCAPE);
            }
            out.push(c);
        }
    }
    out
}

/// Strict integer volume, clamped into range.
pub fn decode_volume(raw: &str) -> Result<Volume, DomainError> {
    raw.trim()
        .parse::<i64>()
        .map(Volume::new)
        .map_err(|_| DomainError::decode_field(PLAYER_STATE, "volume", raw))
}

/// Strict fractional seconds; the missing-value sentinel and empty text are zero.
pub fn decode_position(raw: &str) -> Result<Seconds, DomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == MISSING_VALUE {
        return Ok(Seconds::ZERO);
    }
    parse_seconds(trimmed).ok_or_else(|| DomainError::decode_field(PLAYER_STATE, "position", raw))
}

fn parse_seconds(raw: &str) -> Option<Seconds> {
    raw.parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())
        .map(Seconds::from_secs_f64)
}

/// Decode a player-state line.
///
/// State and repeat mode fall back to `stopped` / `off` when unrecognised;
/// numeric fields must parse or the whole decode fails.
pub fn decode_player_snapshot(raw: &str) -> Result<PlayerSnapshot, DomainError> {
    let [state, volume, position, shuffle, repeat, track_id] =
        split_exact::<PLAYER_FIELD_COUNT>(raw, PLAYER_STATE)?;

    let track_id = TrackId::new(track_id);
    Ok(PlayerSnapshot {
        state: PlayerState::parse_lenient(&state),
        volume: decode_volume(&volume)?,
        position: decode_position(&position)?,
        shuffle: shuffle.trim().eq_ignore_ascii_case("true"),
        repeat: RepeatMode::parse_lenient(&repeat),
        current_track: (!track_id.is_empty()).then_some(track_id),
    })
}

/// Decode a track line. Empty text means no current track.
pub fn decode_track(raw: &str) -> Result<Option<Track>, DomainError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }

    let [id, title, artist, album, duration] = split_exact::<TRACK_FIELD_COUNT>(raw, TRACK)?;
    let duration = parse_seconds(duration.trim())
        .ok_or_else(|| DomainError::decode_field(TRACK, "duration", &duration))?;

    Track::new(TrackId::new(id), title, artist, album, duration).map(Some)
}

/// Wire form of a snapshot, as the `player_state` script emits it.
pub fn encode_player_snapshot(snapshot: &PlayerSnapshot) -> String {
    let track_id = snapshot
        .current_track
        .as_ref()
        .map(TrackId::as_str)
        .unwrap_or_default();
    encode_fields(&[
        snapshot.state.to_string(),
        snapshot.volume.encode(),
        snapshot.position.as_secs().to_string(),
        snapshot.shuffle.to_string(),
        snapshot.repeat.to_string(),
        track_id.to_string(),
    ])
}

/// Wire form of a track, as the `current_track` script emits it.
pub fn encode_track(track: &Track) -> String {
    let duration = track.duration().as_secs().to_string();
    encode_fields(&[
        track.id().as_str(),
        track.title(),
        track.artist(),
        track.album(),
        duration.as_str(),
    ])
}

#[cfg(test)]
#[path = "decode_tests.rs"]
mod tests;
