// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Value objects: identifiers, time spans, volume and player enumerations.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, ErrorKind};

crate::define_id! {
    /// Persistent database identifier of a track in the Music library.
    pub struct TrackId;
}

crate::define_id! {
    /// Persistent identifier of a playlist.
    pub struct PlaylistId;
}

/// Whole-second time span used for track durations and playback positions.
///
/// Never negative: construction from signed or fractional input clamps at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seconds(u64);

impl Seconds {
    pub const ZERO: Seconds = Seconds(0);

    pub fn new(seconds: i64) -> Self {
        Self(u64::try_from(seconds).unwrap_or(0))
    }

    /// Truncates toward zero; negative, NaN and infinite input become zero.
    pub fn from_secs_f64(seconds: f64) -> Self {
        if seconds.is_finite() && seconds > 0.0 {
            Self(seconds.trunc() as u64)
        } else {
            Self::ZERO
        }
    }

    pub fn from_std(duration: Duration) -> Self {
        Self(duration.as_secs())
    }

    pub fn as_secs(self) -> u64 {
        self.0
    }

    pub fn minutes(self) -> u64 {
        self.0 / 60
    }

    pub fn hours(self) -> u64 {
        self.0 / 3600
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Seconds) -> Seconds {
        Seconds(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(self, other: Seconds) -> Seconds {
        Seconds(self.0.saturating_sub(other.0))
    }

    pub fn to_std(self) -> Duration {
        Duration::from_secs(self.0)
    }
}

/// `M:SS`, or `H:MM:SS` from one hour up.
impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hours = self.0 / 3600;
        let minutes = (self.0 % 3600) / 60;
        let seconds = self.0 % 60;
        if hours > 0 {
            write!(f, "{hours}:{minutes:02}:{seconds:02}")
        } else {
            write!(f, "{minutes}:{seconds:02}")
        }
    }
}

/// Playback volume, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volume(u8);

impl Volume {
    pub const MIN: Volume = Volume(0);
    pub const MAX: Volume = Volume(100);

    /// Out-of-range levels are clamped, not rejected.
    pub fn new(level: i64) -> Self {
        Self(level.clamp(0, 100) as u8)
    }

    pub fn level(self) -> u8 {
        self.0
    }

    pub fn is_muted(self) -> bool {
        self == Self::MIN
    }

    pub fn is_max(self) -> bool {
        self == Self::MAX
    }

    pub fn increase(self, amount: i64) -> Self {
        Self::new(i64::from(self.0).saturating_add(amount))
    }

    pub fn decrease(self, amount: i64) -> Self {
        Self::new(i64::from(self.0).saturating_sub(amount))
    }

    /// Level as a fraction in `0.0..=1.0`.
    pub fn fraction(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Wire form: the bare level, as emitted by `sound volume`.
    pub fn encode(self) -> String {
        self.0.to_string()
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(50)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Playback state of the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    #[default]
    Stopped,
    Playing,
    Paused,
    Buffering,
}

crate::simple_display! {
    PlayerState {
        Stopped => "stopped",
        Playing => "playing",
        Paused => "paused",
        Buffering => "buffering",
    }
}

impl PlayerState {
    /// Case-insensitive; anything unrecognised (e.g. `fast forwarding`) is `Stopped`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for PlayerState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stopped" => Ok(PlayerState::Stopped),
            "playing" => Ok(PlayerState::Playing),
            "paused" => Ok(PlayerState::Paused),
            "buffering" => Ok(PlayerState::Buffering),
            _ => Err(DomainError::new(
                ErrorKind::InvalidPlayerState,
                format!("unknown player state {s:?}"),
            )),
        }
    }
}

/// Repeat behaviour of the player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    #[default]
    Off,
    All,
    One,
}

crate::simple_display! {
    RepeatMode {
        Off => "off",
        All => "all",
        One => "one",
    }
}

impl RepeatMode {
    /// Case-insensitive; anything unrecognised is `Off`.
    pub fn parse_lenient(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl FromStr for RepeatMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "off" => Ok(RepeatMode::Off),
            "all" => Ok(RepeatMode::All),
            "one" => Ok(RepeatMode::One),
            _ => Err(DomainError::new(
                ErrorKind::InvalidRepeatMode,
                format!("unknown repeat mode {s:?}"),
            )),
        }
    }
}

/// Kind of playlist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaylistType {
    #[default]
    User,
    Smart,
    Library,
    Queue,
    RecentlyPlayed,
    RecentlyAdded,
}

crate::simple_display! {
    PlaylistType {
        User => "user",
        Smart => "smart",
        Library => "library",
        Queue => "queue",
        RecentlyPlayed => "recently_played",
        RecentlyAdded => "recently_added",
    }
}

impl PlaylistType {
    /// System-managed playlists cannot be edited.
    pub fn is_read_only(self) -> bool {
        matches!(
            self,
            PlaylistType::Library
                | PlaylistType::Queue
                | PlaylistType::RecentlyPlayed
                | PlaylistType::RecentlyAdded
        )
    }
}

#[cfg(test)]
#[path = "values_tests.rs"]
mod tests;
