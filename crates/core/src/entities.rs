// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Domain entities: tracks, playlists and player snapshots.

use std::fmt;

use serde::Serialize;

use crate::error::{keys, DomainError, ErrorKind};
use crate::values::{PlayerState, PlaylistId, PlaylistType, RepeatMode, Seconds, TrackId, Volume};

/// A track in the Music library.
///
/// Validated on construction: id, title and artist must be non-empty. The
/// album may be empty (singles, untagged files).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Track {
    id: TrackId,
    title: String,
    artist: String,
    album: String,
    duration: Seconds,
}

impl Track {
    pub fn new(
        id: TrackId,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        duration: Seconds,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let artist = artist.into();

        if id.is_empty() {
            return Err(DomainError::new(ErrorKind::InvalidTrackId, "track ID cannot be empty"));
        }
        if title.trim().is_empty() {
            return Err(DomainError::new(ErrorKind::InvalidTrack, "track title cannot be empty")
                .with_context(keys::TRACK_ID, id.as_str()));
        }
        if artist.trim().is_empty() {
            return Err(DomainError::new(ErrorKind::InvalidTrack, "track artist cannot be empty")
                .with_context(keys::TRACK_ID, id.as_str()));
        }

        Ok(Self {
            id,
            title,
            artist,
            album: album.into(),
            duration,
        })
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn duration(&self) -> Seconds {
        self.duration
    }

    /// Identity comparison: two tracks are the same if their ids match.
    pub fn same_track(&self, other: &Track) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

/// An ordered collection of track references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    id: PlaylistId,
    name: String,
    kind: PlaylistType,
    read_only: bool,
    tracks: Vec<TrackId>,
}

impl Playlist {
    /// `read_only` is forced on for system playlist types.
    pub fn new(
        id: PlaylistId,
        name: impl Into<String>,
        kind: PlaylistType,
        read_only: bool,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if id.is_empty() {
            return Err(DomainError::new(
                ErrorKind::InvalidPlaylistId,
                "playlist ID cannot be empty",
            ));
        }
        if name.trim().is_empty() {
            return Err(DomainError::new(ErrorKind::InvalidPlaylist, "playlist name cannot be empty")
                .with_context(keys::PLAYLIST_ID, id.as_str()));
        }
        Ok(Self {
            id,
            name,
            kind,
            read_only: read_only || kind.is_read_only(),
            tracks: Vec::new(),
        })
    }

    pub fn id(&self) -> &PlaylistId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PlaylistType {
        self.kind
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn tracks(&self) -> &[TrackId] {
        &self.tracks
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn contains_track(&self, track_id: &TrackId) -> bool {
        self.tracks.contains(track_id)
    }

    pub fn add_track(&mut self, track_id: TrackId) -> Result<(), DomainError> {
        self.ensure_writable()?;
        if track_id.is_empty() {
            return Err(DomainError::new(
                ErrorKind::InvalidTrackId,
                "cannot add empty track ID to playlist",
            ));
        }
        if self.contains_track(&track_id) {
            return Err(DomainError::new(
                ErrorKind::TrackAlreadyInPlaylist,
                format!("track '{track_id}' is already in playlist '{}'", self.name),
            )
            .with_context(keys::TRACK_ID, track_id.as_str())
            .with_context(keys::PLAYLIST_ID, self.id.as_str()));
        }
        self.tracks.push(track_id);
        Ok(())
    }

    pub fn remove_track(&mut self, track_id: &TrackId) -> Result<(), DomainError> {
        self.ensure_writable()?;
        match self.tracks.iter().position(|t| t == track_id) {
            Some(index) => {
                self.tracks.remove(index);
                Ok(())
            }
            None => Err(DomainError::track_not_found(track_id)
                .with_context(keys::PLAYLIST_ID, self.id.as_str())),
        }
    }

    fn ensure_writable(&self) -> Result<(), DomainError> {
        if self.read_only {
            return Err(DomainError::new(
                ErrorKind::PlaylistReadOnly,
                format!("cannot modify read-only playlist '{}'", self.name),
            )
            .with_context(keys::PLAYLIST_ID, self.id.as_str()));
        }
        Ok(())
    }
}

/// Player state captured from one query of the Music app.
///
/// Built whole by the decoder; there is no partial update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSnapshot {
    pub state: PlayerState,
    /// Weak reference: resolve with a separate track lookup.
    pub current_track: Option<TrackId>,
    pub position: Seconds,
    pub volume: Volume,
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for PlayerSnapshot {
    fn default() -> Self {
        Self {
            state: PlayerState::Stopped,
            current_track: None,
            position: Seconds::ZERO,
            volume: Volume::default(),
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

impl PlayerSnapshot {
    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    pub fn is_paused(&self) -> bool {
        self.state == PlayerState::Paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state == PlayerState::Stopped
    }

    pub fn has_current_track(&self) -> bool {
        self.current_track.as_ref().is_some_and(|id| !id.is_empty())
    }
}

#[cfg(test)]
#[path = "entities_tests.rs"]
mod tests;
