// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{PlayerSnapshot, PlayerState, RepeatMode, Seconds, Track, TrackId, Volume};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for domain values.
pub mod strategies {
    use crate::{PlayerSnapshot, PlayerState, RepeatMode, Seconds, Track, TrackId, Volume};
    use proptest::prelude::*;

    pub fn arb_player_state() -> impl Strategy<Value = PlayerState> {
        prop_oneof![
            Just(PlayerState::Stopped),
            Just(PlayerState::Playing),
            Just(PlayerState::Paused),
            Just(PlayerState::Buffering),
        ]
    }

    pub fn arb_repeat_mode() -> impl Strategy<Value = RepeatMode> {
        prop_oneof![
            Just(RepeatMode::Off),
            Just(RepeatMode::All),
            Just(RepeatMode::One),
        ]
    }

    pub fn arb_volume() -> impl Strategy<Value = Volume> {
        (0i64..=100).prop_map(Volume::new)
    }

    pub fn arb_track_id() -> impl Strategy<Value = TrackId> {
        "[A-Za-z0-9]{1,12}".prop_map(TrackId::new)
    }

    pub fn arb_player_snapshot() -> impl Strategy<Value = PlayerSnapshot> {
        (
            arb_player_state(),
            proptest::option::of(arb_track_id()),
            0i64..100_000,
            arb_volume(),
            any::<bool>(),
            arb_repeat_mode(),
        )
            .prop_map(|(state, current_track, position, volume, shuffle, repeat)| PlayerSnapshot {
                state,
                current_track,
                position: Seconds::new(position),
                volume,
                shuffle,
                repeat,
            })
    }

    /// Tracks whose text fields may contain the delimiter and escape characters.
    pub fn arb_track() -> impl Strategy<Value = Track> {
        let text = r"[A-Za-z0-9|\\][A-Za-z0-9 |\\]{0,15}";
        let album_text = r"[A-Za-z0-9 |\\]{0,15}";
        (arb_track_id(), text, text, album_text, 0i64..36_000).prop_filter_map(
            "valid track",
            |(id, title, artist, album, duration)| {
                Track::new(id, title, artist, album, Seconds::new(duration)).ok()
            },
        )
    }
}

// ── Fixtures ────────────────────────────────────────────────────────────

/// Player-state line as the Music app emits it.
pub fn player_state_line(state: &str, volume: i64, position: &str, track_id: &str) -> String {
    format!("{state}|{volume}|{position}|false|off|{track_id}")
}

/// A playing snapshot at volume 75, 2 minutes into track `42`.
pub fn playing_snapshot() -> PlayerSnapshot {
    PlayerSnapshot {
        state: PlayerState::Playing,
        current_track: Some(TrackId::new("42")),
        position: Seconds::new(120),
        volume: Volume::new(75),
        shuffle: true,
        repeat: RepeatMode::Off,
    }
}

pub fn sample_track() -> Track {
    let id = TrackId::new("42");
    match Track::new(id, "Song", "Artist", "Album", Seconds::new(245)) {
        Ok(track) => track,
        Err(e) => unreachable!("sample track is valid: {e}"),
    }
}
