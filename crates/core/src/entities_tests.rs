// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn track(id: &str, title: &str, artist: &str) -> Result<Track, DomainError> {
    Track::new(TrackId::new(id), title, artist, "Album", Seconds::new(200))
}

// --- Track ---

#[test]
fn track_new_accepts_valid_input() {
    let t = track("42", "Song", "Artist").unwrap();
    assert_eq!(t.id(), &TrackId::new("42"));
    assert_eq!(t.title(), "Song");
    assert_eq!(t.artist(), "Artist");
    assert_eq!(t.album(), "Album");
    assert_eq!(t.duration().as_secs(), 200);
    assert_eq!(t.to_string(), "Artist - Song");
}

#[test]
fn track_album_may_be_empty() {
    let t = Track::new(TrackId::new("1"), "Single", "Artist", "", Seconds::ZERO).unwrap();
    assert_eq!(t.album(), "");
}

#[yare::parameterized(
    empty_id     = { "",   "Song", "Artist", ErrorKind::InvalidTrackId },
    blank_id     = { "  ", "Song", "Artist", ErrorKind::InvalidTrackId },
    empty_title  = { "1",  "",     "Artist", ErrorKind::InvalidTrack },
    blank_title  = { "1",  "   ",  "Artist", ErrorKind::InvalidTrack },
    empty_artist = { "1",  "Song", "",       ErrorKind::InvalidTrack },
)]
fn track_new_rejects_invalid_input(id: &str, title: &str, artist: &str, kind: ErrorKind) {
    let err = track(id, title, artist).unwrap_err();
    assert_eq!(err.kind(), kind);
    assert!(err.is_permanent());
}

#[test]
fn same_track_compares_ids_only() {
    let a = track("7", "Song", "Artist").unwrap();
    let b = track("7", "Other", "Someone").unwrap();
    let c = track("8", "Song", "Artist").unwrap();
    assert!(a.same_track(&b));
    assert!(!a.same_track(&c));
}

// --- Playlist ---

fn playlist(kind: PlaylistType, read_only: bool) -> Playlist {
    Playlist::new(PlaylistId::new("P1"), "Mix", kind, read_only).unwrap()
}

#[test]
fn playlist_new_validates() {
    let err = Playlist::new(PlaylistId::new(""), "Mix", PlaylistType::User, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPlaylistId);

    let err = Playlist::new(PlaylistId::new("P1"), " ", PlaylistType::User, false).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPlaylist);
}

#[test]
fn system_playlists_are_forced_read_only() {
    assert!(playlist(PlaylistType::Library, false).is_read_only());
    assert!(!playlist(PlaylistType::Smart, false).is_read_only());
}

#[test]
fn add_and_remove_tracks_preserve_order() {
    let mut p = playlist(PlaylistType::User, false);
    p.add_track(TrackId::new("a")).unwrap();
    p.add_track(TrackId::new("b")).unwrap();
    p.add_track(TrackId::new("c")).unwrap();
    p.remove_track(&TrackId::new("b")).unwrap();

    assert_eq!(p.tracks(), &[TrackId::new("a"), TrackId::new("c")]);
    assert_eq!(p.track_count(), 2);
    assert!(p.contains_track(&TrackId::new("c")));
    assert!(!p.is_empty());
}

#[test]
fn add_duplicate_track_is_conflict() {
    let mut p = playlist(PlaylistType::User, false);
    p.add_track(TrackId::new("a")).unwrap();
    let err = p.add_track(TrackId::new("a")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TrackAlreadyInPlaylist);
    assert_eq!(err.category(), crate::error::Category::Conflict);
    assert_eq!(err.context_str(keys::TRACK_ID), Some("a"));
}

#[test]
fn add_empty_track_id_is_rejected() {
    let mut p = playlist(PlaylistType::User, false);
    let err = p.add_track(TrackId::new("")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTrackId);
    assert!(p.is_empty());
}

#[test]
fn read_only_playlist_rejects_changes() {
    let mut p = playlist(PlaylistType::User, true);
    let err = p.add_track(TrackId::new("a")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PlaylistReadOnly);
    assert!(err.is_permanent());

    let err = p.remove_track(&TrackId::new("a")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PlaylistReadOnly);
}

#[test]
fn remove_missing_track_is_not_found() {
    let mut p = playlist(PlaylistType::User, false);
    let err = p.remove_track(&TrackId::new("zzz")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TrackNotFound);
    assert_eq!(err.context_str(keys::PLAYLIST_ID), Some("P1"));
}

// --- PlayerSnapshot ---

#[test]
fn default_snapshot_is_stopped_without_track() {
    let s = PlayerSnapshot::default();
    assert!(s.is_stopped());
    assert!(!s.has_current_track());
    assert_eq!(s.volume.level(), 50);
    assert_eq!(s.position, Seconds::ZERO);
}

#[test]
fn snapshot_state_queries() {
    let s = PlayerSnapshot {
        state: PlayerState::Paused,
        current_track: Some(TrackId::new("9")),
        ..PlayerSnapshot::default()
    };
    assert!(s.is_paused());
    assert!(!s.is_playing());
    assert!(s.has_current_track());
}

#[test]
fn snapshot_serializes_with_lowercase_enums() {
    let s = PlayerSnapshot {
        state: PlayerState::Playing,
        current_track: Some(TrackId::new("42")),
        position: Seconds::new(120),
        volume: Volume::new(75),
        shuffle: true,
        repeat: RepeatMode::All,
    };
    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "state": "playing",
            "current_track": "42",
            "position": 120,
            "volume": 75,
            "shuffle": true,
            "repeat": "all",
        })
    );
}
