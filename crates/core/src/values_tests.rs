// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

// --- Identifiers ---

#[test]
fn track_id_trims_input() {
    let id = TrackId::new("  42 \n");
    assert_eq!(id, "42");
    assert_eq!(id.to_string(), "42");
    assert!(!id.is_empty());
}

#[test]
fn blank_track_id_is_empty() {
    assert!(TrackId::new("   ").is_empty());
    assert!(PlaylistId::from("").is_empty());
}

#[test]
fn ids_serialize_transparently() {
    let id = TrackId::new("A1B2");
    assert_eq!(serde_json::to_string(&id).unwrap(), r#""A1B2""#);
}

// --- Seconds ---

#[yare::parameterized(
    zero        = { 0,     "0:00" },
    seconds     = { 7,     "0:07" },
    minutes     = { 185,   "3:05" },
    hour        = { 3600,  "1:00:00" },
    long        = { 3725,  "1:02:05" },
)]
fn seconds_display(secs: i64, expected: &str) {
    assert_eq!(Seconds::new(secs).to_string(), expected);
}

#[test]
fn seconds_clamp_negative_to_zero() {
    assert_eq!(Seconds::new(-10), Seconds::ZERO);
    assert_eq!(Seconds::from_secs_f64(-0.5), Seconds::ZERO);
    assert_eq!(Seconds::from_secs_f64(f64::NAN), Seconds::ZERO);
    assert_eq!(Seconds::from_secs_f64(f64::INFINITY), Seconds::ZERO);
}

#[test]
fn seconds_truncate_fractions() {
    assert_eq!(Seconds::from_secs_f64(120.9).as_secs(), 120);
}

#[test]
fn seconds_arithmetic_saturates() {
    let a = Seconds::new(30);
    let b = Seconds::new(45);
    assert_eq!(a.saturating_add(b).as_secs(), 75);
    assert_eq!(a.saturating_sub(b), Seconds::ZERO);
    assert_eq!(b.saturating_sub(a).as_secs(), 15);
}

#[test]
fn seconds_unit_accessors() {
    let s = Seconds::new(7384);
    assert_eq!(s.hours(), 2);
    assert_eq!(s.minutes(), 123);
    assert_eq!(s.to_std(), Duration::from_secs(7384));
    assert_eq!(Seconds::from_std(Duration::from_millis(2999)).as_secs(), 2);
}

// --- Volume ---

#[yare::parameterized(
    below_zero = { -5,  0 },
    zero       = { 0,   0 },
    middle     = { 75,  75 },
    max        = { 100, 100 },
    above_max  = { 150, 100 },
    huge       = { i64::MAX, 100 },
)]
fn volume_clamps(input: i64, expected: u8) {
    assert_eq!(Volume::new(input).level(), expected);
}

#[test]
fn volume_steps_stay_in_range() {
    assert_eq!(Volume::new(95).increase(10), Volume::MAX);
    assert_eq!(Volume::new(5).decrease(10), Volume::MIN);
    assert!(Volume::new(0).is_muted());
    assert!(Volume::new(100).is_max());
}

#[test]
fn volume_display_and_fraction() {
    let v = Volume::new(75);
    assert_eq!(v.to_string(), "75%");
    assert_eq!(v.encode(), "75");
    assert!((v.fraction() - 0.75).abs() < f64::EPSILON);
}

proptest! {
    #[test]
    fn volume_new_is_always_in_range(level in any::<i64>()) {
        let v = Volume::new(level);
        prop_assert!(v.level() <= 100);
    }
}

// --- Enumerations ---

#[yare::parameterized(
    stopped   = { "stopped",   PlayerState::Stopped },
    playing   = { "Playing",   PlayerState::Playing },
    paused    = { "PAUSED",    PlayerState::Paused },
    buffering = { "buffering", PlayerState::Buffering },
    unknown   = { "fast forwarding", PlayerState::Stopped },
    empty     = { "",          PlayerState::Stopped },
)]
fn player_state_parse_lenient(input: &str, expected: PlayerState) {
    assert_eq!(PlayerState::parse_lenient(input), expected);
}

#[test]
fn player_state_strict_parse_rejects_unknown() {
    let err = "rewinding".parse::<PlayerState>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPlayerState);
}

#[yare::parameterized(
    off     = { "off", RepeatMode::Off },
    all     = { "ALL", RepeatMode::All },
    one     = { "One", RepeatMode::One },
    unknown = { "sometimes", RepeatMode::Off },
)]
fn repeat_mode_parse_lenient(input: &str, expected: RepeatMode) {
    assert_eq!(RepeatMode::parse_lenient(input), expected);
}

#[test]
fn repeat_mode_strict_parse_rejects_unknown() {
    let err = "twice".parse::<RepeatMode>().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidRepeatMode);
    assert!(err.is_permanent());
}

#[yare::parameterized(
    user            = { PlaylistType::User,           false },
    smart           = { PlaylistType::Smart,          false },
    library         = { PlaylistType::Library,        true },
    queue           = { PlaylistType::Queue,          true },
    recently_played = { PlaylistType::RecentlyPlayed, true },
    recently_added  = { PlaylistType::RecentlyAdded,  true },
)]
fn playlist_type_read_only(kind: PlaylistType, read_only: bool) {
    assert_eq!(kind.is_read_only(), read_only);
}

#[test]
fn enums_display_lowercase() {
    assert_eq!(PlayerState::Buffering.to_string(), "buffering");
    assert_eq!(RepeatMode::One.to_string(), "one");
    assert_eq!(PlaylistType::RecentlyAdded.to_string(), "recently_added");
}
