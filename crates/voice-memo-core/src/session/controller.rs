use crate::{
    AudioError, CoreResult,
    artifact::{Artifact, ArtifactStore},
    audio::{AudioBackend, AudioSession, Player, Recorder, RecordingFormat, SessionPlatform},
    session::{
        Alert, AlertPresenter, DisplayState, ElapsedTime, Mode, PlayLabel, SessionEvent,
        SessionLimits, TickTimer, UploadClient,
    },
};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument, trace, warn};
use uuid::Uuid;

/// Everything a [`SessionController`] drives.
pub struct SessionParts {
    /// Opens capture and playback devices.
    pub backend: Box<dyn AudioBackend>,
    /// Platform audio session shared by recorder and player.
    pub session_platform: Box<dyn SessionPlatform>,
    /// Where artifacts are written.
    pub store: ArtifactStore,
    /// Encoding applied to every recording.
    pub format: RecordingFormat,
    /// Maximum recording length.
    pub limits: SessionLimits,
    /// Cloud upload client.
    pub uploader: Box<dyn UploadClient>,
    /// User notifications.
    pub alerts: Box<dyn AlertPresenter>,
    /// Tick source.
    pub timer: Box<dyn TickTimer>,
}

/// Recording/playback session state machine.
///
/// Owns the current [`Mode`], the cycle's [`Recorder`] and [`Player`], and
/// the [`DisplayState`]. All methods run on the event loop's thread; device
/// completion arrives through [`handle_event`](Self::handle_event).
///
/// # Invariants
///
/// - Recording and Playing are mutually exclusive.
/// - The tick timer runs iff the mode is not Idle; it is started on every
///   entry into Recording or Playing and stopped exactly once on every exit.
/// - A recording longer than the configured maximum is stopped on the tick
///   that observes it and saved when its completion arrives or before the
///   next button is handled, whichever comes first.
pub struct SessionController {
    backend: Box<dyn AudioBackend>,
    session: AudioSession,
    store: ArtifactStore,
    format: RecordingFormat,
    limits: SessionLimits,
    uploader: Box<dyn UploadClient>,
    alerts: Box<dyn AlertPresenter>,
    timer: Box<dyn TickTimer>,
    mode: Mode,
    recorder: Option<Recorder>,
    player: Option<Player>,
    staged: Option<Artifact>,
    elapsed_secs: Option<u64>,
    cutoff_requested: bool,
    overrun_save_pending: bool,
    display: DisplayState,
    cycle_id: Uuid,
}

impl SessionController {
    /// Build the controller and prepare the first recorder.
    ///
    /// A recorder that cannot be prepared is reported through the alert
    /// presenter; the next record tap tries again.
    #[instrument(skip(parts))]
    pub fn new(parts: SessionParts) -> Self {
        let SessionParts {
            backend,
            session_platform,
            store,
            format,
            limits,
            uploader,
            alerts,
            timer,
        } = parts;

        let mut controller = Self {
            backend,
            session: AudioSession::new(session_platform),
            store,
            format,
            limits,
            uploader,
            alerts,
            timer,
            mode: Mode::Idle,
            recorder: None,
            player: None,
            staged: None,
            elapsed_secs: None,
            cutoff_requested: false,
            overrun_save_pending: false,
            display: DisplayState::default(),
            cycle_id: Uuid::new_v4(),
        };

        if let Err(e) = controller.ensure_recorder() {
            controller.report(&e);
        }

        info!(
            cycle_id = %controller.cycle_id,
            recordings_dir = ?controller.store.dir(),
            max_duration = ?limits.max_duration(),
            "Session controller ready"
        );

        controller
    }

    /// Current activity.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// What the front-end should show.
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Seconds shown by the timer on the last tick, `None` once cleared.
    pub fn elapsed_secs(&self) -> Option<u64> {
        self.elapsed_secs
    }

    /// Duration limits.
    pub fn limits(&self) -> SessionLimits {
        self.limits
    }

    /// Artifact staged for upload, if any.
    pub fn staged_artifact(&self) -> Option<&Artifact> {
        self.staged.as_ref()
    }

    /// This cycle's recorder.
    pub fn recorder(&self) -> Option<&Recorder> {
        self.recorder.as_ref()
    }

    /// Player for the last artifact.
    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    /// Correlation id of the current recording cycle.
    pub fn cycle_id(&self) -> Uuid {
        self.cycle_id
    }

    /// Whether the tick timer is running.
    pub fn is_ticking(&self) -> bool {
        self.timer.is_running()
    }

    /// Record button: stop playback if needed, then toggle recording.
    ///
    /// A recording that was cut off and is still waiting for its completion
    /// event is saved first, so the new recording cannot overwrite it.
    #[instrument(skip(self), fields(cycle_id = %self.cycle_id, mode = %self.mode))]
    pub fn on_record_button(&mut self) {
        self.complete_overrun_save();

        if self.mode == Mode::Playing {
            self.end_playback();
        }

        let result = match self.mode {
            Mode::Recording => self.stop_recording(),
            Mode::Idle | Mode::Playing => self.start_recording(),
        };

        if let Err(e) = result {
            self.report(&e);
        }
    }

    /// Play button: toggle playback. Ignored while recording.
    #[instrument(skip(self), fields(cycle_id = %self.cycle_id, mode = %self.mode))]
    pub fn on_play_button(&mut self) {
        self.complete_overrun_save();

        match self.mode {
            Mode::Recording => debug!("Play ignored while recording"),
            Mode::Playing => self.end_playback(),
            Mode::Idle => {
                if let Err(e) = self.start_playing() {
                    self.report(&e);
                }
            }
        }
    }

    /// Save button: save-and-reset, then confirm.
    #[instrument(skip(self), fields(cycle_id = %self.cycle_id, mode = %self.mode))]
    pub fn on_save_tapped(&mut self) {
        self.complete_overrun_save();

        if self.mode == Mode::Recording || !self.display.save_enabled {
            debug!("Save ignored, nothing to save");
            return;
        }

        match self.save_and_reset_to_defaults() {
            Ok(()) => self.alerts.present(&Alert::saved()),
            Err(e) => self.report(&e),
        }
    }

    /// Periodic tick: refresh the timer and enforce the cutoff.
    pub fn on_tick(&mut self) {
        let elapsed = match self.mode {
            Mode::Idle => {
                trace!("Tick ignored while idle");
                return;
            }
            Mode::Recording => self.tick_recording(),
            Mode::Playing => self.tick_playing(),
        };

        let Some(elapsed) = elapsed else {
            return;
        };
        self.elapsed_secs = Some(elapsed);

        if elapsed > 0 {
            self.display.timer_text = ElapsedTime::from_secs(elapsed).to_string();
            self.display.warning = self.limits.is_warning(elapsed);
        }
    }

    /// Deliver a device completion event.
    pub fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::RecordingFinished { success } => self.on_recording_finished(success),
            SessionEvent::PlaybackFinished { success } => self.on_playback_finished(success),
        }
    }

    /// Capture finished: bind a player to the artifact and auto-save overruns.
    #[instrument(skip(self), fields(cycle_id = %self.cycle_id))]
    pub fn on_recording_finished(&mut self, success: bool) {
        let Some(artifact) = self
            .recorder
            .as_ref()
            .and_then(|recorder| recorder.artifact())
            .cloned()
        else {
            warn!("Recording finished without a stopped artifact");
            return;
        };

        if !success {
            warn!(artifact_id = %artifact.id, "Capture reported an unsuccessful finish");
        }

        match self.open_player(artifact) {
            Ok(player) => {
                debug!(artifact_id = %player.artifact().id, "Player ready");
                self.player = Some(player);
            }
            Err(e) => {
                self.display.play_enabled = false;
                self.report(&e);
            }
        }

        if self.overrun_save_pending {
            info!("Saving overrun recording");
            self.complete_overrun_save();
        }
    }

    /// Playback reached the end: reset the play button.
    #[instrument(skip(self), fields(cycle_id = %self.cycle_id))]
    pub fn on_playback_finished(&mut self, success: bool) {
        if !success {
            warn!("Playback reported an unsuccessful finish");
        }
        self.display.play_label = PlayLabel::Play;
    }

    /// Commit the staged artifact and return to a fresh cycle.
    ///
    /// On success the mode is Idle, the timer is cleared and hidden, the
    /// player is gone and a new recorder is ready. If the upload client
    /// fails nothing is reset, so the user can try again.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::CaptureStopFailed`] if called while recording
    /// and capture cannot be stopped, or the upload client's error.
    #[instrument(skip(self), fields(cycle_id = %self.cycle_id, mode = %self.mode))]
    pub fn save_and_reset_to_defaults(&mut self) -> CoreResult<()> {
        self.overrun_save_pending = false;

        match self.mode {
            Mode::Recording => self.stop_recording()?,
            Mode::Playing => self.end_playback(),
            Mode::Idle => {}
        }

        self.uploader.save()?;

        info!(
            artifact_id = self.staged.as_ref().map(|a| a.id.as_str()),
            "Recording saved"
        );

        self.display.save_enabled = false;
        self.display.play_enabled = false;
        self.display.play_label = PlayLabel::Play;
        self.display.hide_timer();
        self.elapsed_secs = None;
        self.player = None;
        self.staged = None;
        self.recorder = None;
        self.cycle_id = Uuid::new_v4();

        if let Err(e) = self.ensure_recorder() {
            self.report(&e);
        }

        Ok(())
    }

    fn start_recording(&mut self) -> CoreResult<()> {
        self.ensure_recorder()?;

        // Capture truncates the artifact file: close the previous player's
        // handle on it first.
        self.player = None;

        let started = match self.recorder.as_mut() {
            Some(recorder) => recorder.record(),
            None => return Ok(()),
        };
        if let Err(e) = started {
            self.reopen_staged_player();
            return Err(e);
        }

        if let Some(recorder) = self.recorder.as_ref() {
            info!(
                artifact_id = %recorder.artifact_id(),
                path = ?recorder.artifact_path(),
                sample_rate = recorder.format().sample_rate,
                channels = recorder.format().channels,
                "Recording started"
            );
        }

        // The new recording supersedes the previous artifact.
        self.staged = None;

        self.mode = Mode::Recording;
        self.cutoff_requested = false;
        self.elapsed_secs = Some(0);
        self.display.play_enabled = false;
        self.display.save_enabled = false;
        self.display.play_label = PlayLabel::Play;
        self.display.show_timer();
        self.timer.start();

        Ok(())
    }

    fn stop_recording(&mut self) -> CoreResult<()> {
        let Some(recorder) = self.recorder.as_mut() else {
            return Ok(());
        };
        let artifact = recorder.stop()?;

        self.uploader.stage(&artifact.id, &artifact.path);

        info!(
            artifact_id = %artifact.id,
            duration_ms = artifact.duration.as_millis(),
            "Recording stopped and staged"
        );

        self.staged = Some(artifact);
        self.display.play_enabled = true;
        self.display.save_enabled = true;
        self.exit_mode();

        Ok(())
    }

    fn start_playing(&mut self) -> CoreResult<()> {
        if !self.display.play_enabled {
            debug!("Play ignored, nothing to play");
            return Ok(());
        }
        let Some(player) = self.player.as_mut() else {
            debug!("Play ignored, player not ready");
            return Ok(());
        };

        player.play()?;

        self.mode = Mode::Playing;
        self.display.play_label = PlayLabel::Pause;
        self.timer.start();

        Ok(())
    }

    /// Leave Playing, whether the user paused or playback ran out.
    fn end_playback(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.stop();
        }
        self.display.play_label = PlayLabel::Play;
        self.exit_mode();
    }

    fn tick_recording(&mut self) -> Option<u64> {
        let elapsed = self.recorder.as_ref()?.current_time().as_secs();

        if self.limits.is_overrun(elapsed) && !self.cutoff_requested {
            self.cutoff_requested = true;
            warn!(
                elapsed_secs = elapsed,
                max_duration_secs = self.limits.max_duration_secs(),
                "Maximum recording length exceeded, stopping"
            );
            match self.stop_recording() {
                Ok(()) => self.overrun_save_pending = true,
                Err(e) => self.report(&e),
            }
        }

        Some(elapsed)
    }

    fn tick_playing(&mut self) -> Option<u64> {
        let player = self.player.as_ref()?;

        if player.is_playing() {
            return Some(player.remaining().as_secs());
        }

        // Playback ended before its completion event: show the full length.
        let duration = player.duration().as_secs();
        debug!(duration_secs = duration, "Playback ended, leaving playing mode");
        self.end_playback();

        Some(duration)
    }

    /// Save a cut-off recording if one is still waiting.
    fn complete_overrun_save(&mut self) {
        if !self.overrun_save_pending {
            return;
        }
        self.overrun_save_pending = false;

        if let Err(e) = self.save_and_reset_to_defaults() {
            self.report(&e);
        }
    }

    /// Rebind a player to the staged artifact after a failed capture start.
    fn reopen_staged_player(&mut self) {
        let Some(artifact) = self.staged.clone() else {
            return;
        };

        match self.open_player(artifact) {
            Ok(player) => self.player = Some(player),
            Err(e) => {
                warn!(error = ?e, "Could not reopen the previous recording");
                self.display.play_enabled = false;
            }
        }
    }

    fn exit_mode(&mut self) {
        if self.mode == Mode::Idle {
            return;
        }
        debug!(from = %self.mode, "Returning to idle");
        self.mode = Mode::Idle;
        self.timer.stop();
    }

    #[track_caller]
    fn ensure_recorder(&mut self) -> CoreResult<()> {
        if self.recorder.is_some() {
            return Ok(());
        }

        let location = Location::caller();
        let device = self
            .backend
            .open_capture()
            .map_err(|e| AudioError::CaptureStartFailed {
                source: Box::new(e),
                location: ErrorLocation::from(location),
            })?;

        let recorder = Recorder::new(device, self.session.clone(), &mut self.store, self.format)?;
        self.recorder = Some(recorder);

        Ok(())
    }

    #[track_caller]
    fn open_player(&mut self, artifact: Artifact) -> CoreResult<Player> {
        let location = Location::caller();
        let device = self
            .backend
            .open_playback(artifact.path())
            .map_err(|e| AudioError::PlaybackFailed {
                source: Box::new(e),
                location: ErrorLocation::from(location),
            })?;

        Ok(Player::new(device, self.session.clone(), artifact))
    }

    fn report(&mut self, err: &AudioError) {
        error!(cycle_id = %self.cycle_id, error = ?err, "Session operation failed");
        self.alerts.present(&Alert::error(err.alert_message()));
    }
}
