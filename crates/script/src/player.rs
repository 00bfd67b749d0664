// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Music app playback control built on script templates.

use async_trait::async_trait;
use maestro_core::{
    decode_player_snapshot, decode_track, keys, DomainError, ErrorKind, PlayerSnapshot,
    RepeatMode, Seconds, Track, TrackId, Volume,
};
use tokio_util::sync::CancellationToken;

use crate::executor::Executor;
use crate::runner::{ProcessRunner, ScriptRunner};
use crate::template::{escape_applescript_string, TemplateParams};

const HEALTHY: &str = "ok";
const UNAVAILABLE: &str = "Music app is not available";

/// Playback control and state queries for the Music app
#[async_trait]
pub trait PlayerControl: Send + Sync {
    async fn play(&self, track_id: &TrackId, cancel: &CancellationToken) -> Result<(), DomainError>;
    async fn pause(&self, cancel: &CancellationToken) -> Result<(), DomainError>;
    async fn stop(&self, cancel: &CancellationToken) -> Result<(), DomainError>;
    async fn resume(&self, cancel: &CancellationToken) -> Result<(), DomainError>;
    async fn next(&self, cancel: &CancellationToken) -> Result<(), DomainError>;
    async fn previous(&self, cancel: &CancellationToken) -> Result<(), DomainError>;
    async fn seek(&self, position: Seconds, cancel: &CancellationToken) -> Result<(), DomainError>;
    async fn set_volume(
        &self,
        volume: Volume,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError>;
    async fn set_shuffle(
        &self,
        enabled: bool,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError>;
    async fn set_repeat(
        &self,
        mode: RepeatMode,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError>;

    /// Snapshot of the player, decoded from one script call.
    async fn current_state(
        &self,
        cancel: &CancellationToken,
    ) -> Result<PlayerSnapshot, DomainError>;

    /// The loaded track, or `None` when nothing is loaded.
    async fn current_track(&self, cancel: &CancellationToken) -> Result<Option<Track>, DomainError>;

    /// Check that the Music app is running and scriptable.
    async fn health_check(&self, cancel: &CancellationToken) -> Result<(), DomainError>;
}

/// [`PlayerControl`] over AppleScript templates run by an [`Executor`].
#[derive(Debug, Clone)]
pub struct AppleScriptPlayer<R = ProcessRunner> {
    executor: Executor<R>,
}

impl<R: ScriptRunner> AppleScriptPlayer<R> {
    pub fn new(executor: Executor<R>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Executor<R> {
        &self.executor
    }

    /// Run `template`, wrapping any failure as "failed to {action}".
    async fn run(
        &self,
        template: &str,
        params: TemplateParams,
        action: &str,
        cancel: &CancellationToken,
    ) -> Result<String, DomainError> {
        let result = self
            .executor
            .execute_template(template, &params, cancel)
            .await;
        result.into_result().map_err(|e| {
            tracing::warn!(operation = template, error = %e, "player operation failed");
            DomainError::new(ErrorKind::OperationFailed, format!("failed to {action}"))
                .with_source(e)
                .with_context(keys::OPERATION, template)
        })
    }

    async fn command(
        &self,
        template: &str,
        params: TemplateParams,
        action: &str,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        self.run(template, params, action, cancel).await.map(drop)
    }

    /// [`Self::command`] for templates without placeholders.
    async fn trigger(
        &self,
        template: &str,
        action: &str,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        let params = TemplateParams::new();
        self.command(template, params, action, cancel).await
    }
}

#[async_trait]
impl<R: ScriptRunner> PlayerControl for AppleScriptPlayer<R> {
    async fn play(
        &self,
        track_id: &TrackId,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        if track_id.is_empty() {
            return Err(DomainError::new(ErrorKind::InvalidTrackId, "track ID cannot be empty"));
        }
        let escaped = escape_applescript_string(track_id.as_str());
        let params = TemplateParams::new().with("track_id", escaped)?;
        self.run("play_track", params, "play track", cancel)
            .await
            .map(drop)
            .map_err(|e| e.with_context(keys::TRACK_ID, track_id.as_str()))
    }

    async fn pause(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.trigger("pause", "pause playback", cancel).await
    }

    async fn stop(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.trigger("stop", "stop playback", cancel).await
    }

    async fn resume(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.trigger("resume", "resume playback", cancel).await
    }

    async fn next(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.trigger("next_track", "skip to next track", cancel)
            .await
    }

    async fn previous(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        self.trigger("previous_track", "go to previous track", cancel)
            .await
    }

    async fn seek(&self, position: Seconds, cancel: &CancellationToken) -> Result<(), DomainError> {
        let params = TemplateParams::new().with("position", position.as_secs())?;
        self.command("seek", params, "seek", cancel).await
    }

    async fn set_volume(
        &self,
        volume: Volume,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        let params = TemplateParams::new().with("volume", volume.level())?;
        self.command("set_volume", params, "set volume", cancel)
            .await
    }

    async fn set_shuffle(
        &self,
        enabled: bool,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        let params = TemplateParams::new().with("enabled", enabled)?;
        self.command("set_shuffle", params, "set shuffle", cancel)
            .await
    }

    async fn set_repeat(
        &self,
        mode: RepeatMode,
        cancel: &CancellationToken,
    ) -> Result<(), DomainError> {
        let params = TemplateParams::new().with("mode", mode)?;
        self.command("set_repeat", params, "set repeat mode", cancel)
            .await
    }

    async fn current_state(
        &self,
        cancel: &CancellationToken,
    ) -> Result<PlayerSnapshot, DomainError> {
        let params = TemplateParams::new();
        let raw = self
            .run("player_state", params, "get player state", cancel)
            .await?;
        decode_player_snapshot(&raw)
    }

    async fn current_track(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Option<Track>, DomainError> {
        let params = TemplateParams::new();
        let raw = self
            .run("current_track", params, "get current track", cancel)
            .await?;
        decode_track(&raw)
    }

    async fn health_check(&self, cancel: &CancellationToken) -> Result<(), DomainError> {
        let params = TemplateParams::new();
        let result = self
            .executor
            .execute_template("health_check", &params, cancel)
            .await;
        match result.into_result() {
            Ok(output) if output == HEALTHY => Ok(()),
            Ok(output) => Err(DomainError::new(
                ErrorKind::PlayerNotAvailable,
                format!("{UNAVAILABLE}: {output}"),
            )),
            Err(e) => {
                Err(DomainError::new(ErrorKind::PlayerNotAvailable, UNAVAILABLE).with_source(e))
            }
        }
    }
}

#[cfg(test)]
#[path = "player_tests.rs"]
mod tests;
