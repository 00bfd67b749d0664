// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! maestro-core: domain model, error taxonomy and script-output decoding
//! for the maestro Music app controller

pub mod macros;

pub mod decode;
pub mod entities;
pub mod error;
pub mod values;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use decode::{
    decode_player_snapshot, decode_position, decode_track, decode_volume, encode_fields,
    encode_player_snapshot, encode_track, split_exact, split_fields, FIELD_DELIMITER,
    MISSING_VALUE, PLAYER_FIELD_COUNT, TRACK_FIELD_COUNT,
};
pub use entities::{PlayerSnapshot, Playlist, Track};
pub use error::{
    find_domain_error, format_timeout, is_permanent, is_retryable, keys, BoxError, Category,
    ContextValue, DomainError, ErrorGroup, ErrorKind,
};
pub use values::{PlayerState, PlaylistId, PlaylistType, RepeatMode, Seconds, TrackId, Volume};
