use crate::{
    AudioError, CoreResult,
    artifact::Artifact,
    audio::{AudioSession, PlaybackDevice, SessionHolder, SessionLease},
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tracing::{info, instrument};

/// Playback of exactly one artifact.
///
/// Never retargeted: a new recording produces a new player.
pub struct Player {
    device: Box<dyn PlaybackDevice>,
    session: AudioSession,
    artifact: Artifact,
    lease: Option<SessionLease>,
}

impl Player {
    /// Bind `device` to `artifact`.
    pub fn new(device: Box<dyn PlaybackDevice>, session: AudioSession, artifact: Artifact) -> Self {
        Self {
            device,
            session,
            artifact,
            lease: None,
        }
    }

    /// Acquire the audio session and start or resume playback.
    #[track_caller]
    #[instrument(skip(self), fields(artifact_id = %self.artifact.id))]
    pub fn play(&mut self) -> CoreResult<()> {
        let location = Location::caller();

        let lease = self
            .session
            .acquire(SessionHolder::Player)
            .map_err(|e| AudioError::PlaybackFailed {
                source: Box::new(e),
                location: ErrorLocation::from(location),
            })?;

        self.device.play().map_err(|e| AudioError::PlaybackFailed {
            source: Box::new(e),
            location: ErrorLocation::from(location),
        })?;

        self.lease = Some(lease);

        info!(
            position_ms = self.device.current_time().as_millis(),
            duration_ms = self.device.duration().as_millis(),
            "Playback started"
        );

        Ok(())
    }

    /// Stop playback (if still running) and release the audio session.
    ///
    /// Also used after playback ran to completion, where only the session
    /// needs releasing.
    #[instrument(skip(self), fields(artifact_id = %self.artifact.id))]
    pub fn stop(&mut self) {
        if self.device.is_playing() {
            self.device.stop();
            info!("Playback stopped");
        }
        self.lease = None;
    }

    /// Total length of the artifact.
    pub fn duration(&self) -> Duration {
        self.device.duration()
    }

    /// Playback position.
    pub fn current_time(&self) -> Duration {
        self.device.current_time()
    }

    /// Time left until the end of the artifact.
    pub fn remaining(&self) -> Duration {
        self.duration().saturating_sub(self.current_time())
    }

    /// Whether audio is being played.
    pub fn is_playing(&self) -> bool {
        self.device.is_playing()
    }

    /// The artifact this player is bound to.
    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }
}
