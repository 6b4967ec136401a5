//! Scripted devices and collaborators sharing one observable [`Rig`].

use crate::{
    Alert, AlertPresenter, ArtifactStore, AudioBackend, AudioError, CaptureDevice, CoreResult,
    EventReceiver, EventSender, PlaybackDevice, RecordingFormat, SessionCategory, SessionController,
    SessionEvent, SessionLimits, SessionParts, SessionPlatform, TickTimer, UploadClient,
};

use std::{
    cell::RefCell,
    panic::Location,
    path::{Path, PathBuf},
    rc::Rc,
    sync::mpsc,
    time::Duration,
};

use error_location::ErrorLocation;
use tempfile::TempDir;

/// Observable state and failure switches for every fake.
#[derive(Debug, Default)]
pub(crate) struct Rig {
    // capture
    pub capture_time: Duration,
    pub recording: bool,
    pub captures_opened: usize,
    pub prepared: Vec<(PathBuf, RecordingFormat)>,
    pub fail_open_capture: bool,
    pub fail_prepare: bool,
    pub fail_record: bool,
    pub fail_stop: bool,
    pub open_players_at_record: Option<usize>,
    // playback
    pub playback_position: Duration,
    pub playing: bool,
    pub players_opened: usize,
    pub open_players: usize,
    pub fail_open_playback: bool,
    pub fail_play: bool,
    // session platform
    pub session_active: bool,
    pub activations: usize,
    pub deactivations: usize,
    pub fail_category: bool,
    pub fail_activate: bool,
    pub fail_deactivate: bool,
    // collaborators
    pub staged: Vec<(String, PathBuf)>,
    pub saves: usize,
    pub fail_save: bool,
    pub alerts: Vec<Alert>,
    pub timer_running: bool,
    pub timer_starts: usize,
    pub timer_stops: usize,
}

pub(crate) type SharedRig = Rc<RefCell<Rig>>;

#[track_caller]
pub(crate) fn device_error(reason: &str) -> AudioError {
    AudioError::DeviceError {
        reason: reason.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

pub(crate) struct FakeSession(pub SharedRig);

impl SessionPlatform for FakeSession {
    fn set_category(&mut self, _category: SessionCategory) -> CoreResult<()> {
        if self.0.borrow().fail_category {
            return Err(device_error("category refused"));
        }
        Ok(())
    }

    fn set_active(&mut self, active: bool) -> CoreResult<()> {
        let mut rig = self.0.borrow_mut();
        if active {
            if rig.fail_activate {
                return Err(device_error("activation refused"));
            }
            rig.activations += 1;
        } else {
            if rig.fail_deactivate {
                return Err(device_error("deactivation refused"));
            }
            rig.deactivations += 1;
        }
        rig.session_active = active;
        Ok(())
    }
}

pub(crate) struct FakeCapture {
    pub rig: SharedRig,
    pub events: EventSender,
}

impl CaptureDevice for FakeCapture {
    fn prepare(&mut self, path: &Path, format: &RecordingFormat) -> CoreResult<()> {
        let mut rig = self.rig.borrow_mut();
        if rig.fail_prepare {
            return Err(device_error("prepare failed"));
        }
        rig.prepared.push((path.to_path_buf(), *format));
        Ok(())
    }

    fn record(&mut self) -> CoreResult<()> {
        let mut rig = self.rig.borrow_mut();
        if rig.fail_record {
            return Err(device_error("record failed"));
        }
        rig.open_players_at_record = Some(rig.open_players);
        rig.recording = true;
        rig.capture_time = Duration::ZERO;
        Ok(())
    }

    fn stop(&mut self) -> CoreResult<()> {
        {
            let mut rig = self.rig.borrow_mut();
            if rig.fail_stop {
                return Err(device_error("stop failed"));
            }
            if !rig.recording {
                return Ok(());
            }
            rig.recording = false;
        }
        let _ = self
            .events
            .send(SessionEvent::RecordingFinished { success: true });
        Ok(())
    }

    fn current_time(&self) -> Duration {
        self.rig.borrow().capture_time
    }

    fn is_recording(&self) -> bool {
        self.rig.borrow().recording
    }
}

pub(crate) struct FakePlayback {
    pub rig: SharedRig,
    pub duration: Duration,
}

impl PlaybackDevice for FakePlayback {
    fn play(&mut self) -> CoreResult<()> {
        let mut rig = self.rig.borrow_mut();
        if rig.fail_play {
            return Err(device_error("play failed"));
        }
        if rig.playback_position >= self.duration {
            rig.playback_position = Duration::ZERO;
        }
        rig.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.rig.borrow_mut().playing = false;
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn current_time(&self) -> Duration {
        self.rig.borrow().playback_position
    }

    fn is_playing(&self) -> bool {
        self.rig.borrow().playing
    }
}

impl Drop for FakePlayback {
    fn drop(&mut self) {
        if let Ok(mut rig) = self.rig.try_borrow_mut() {
            rig.open_players -= 1;
        }
    }
}

/// Playback length equals the capture length at the time the player opens.
pub(crate) struct FakeBackend {
    pub rig: SharedRig,
    pub events: EventSender,
}

impl AudioBackend for FakeBackend {
    fn open_capture(&mut self) -> CoreResult<Box<dyn CaptureDevice>> {
        if self.rig.borrow().fail_open_capture {
            return Err(device_error("no microphone"));
        }
        self.rig.borrow_mut().captures_opened += 1;
        Ok(Box::new(FakeCapture {
            rig: Rc::clone(&self.rig),
            events: self.events.clone(),
        }))
    }

    fn open_playback(&mut self, _path: &Path) -> CoreResult<Box<dyn PlaybackDevice>> {
        let mut rig = self.rig.borrow_mut();
        if rig.fail_open_playback {
            return Err(device_error("no output device"));
        }
        rig.players_opened += 1;
        rig.open_players += 1;
        rig.playback_position = Duration::ZERO;
        Ok(Box::new(FakePlayback {
            rig: Rc::clone(&self.rig),
            duration: rig.capture_time,
        }))
    }
}

pub(crate) struct FakeUploader(pub SharedRig);

impl UploadClient for FakeUploader {
    fn stage(&mut self, artifact_id: &str, local_path: &Path) {
        self.0
            .borrow_mut()
            .staged
            .push((artifact_id.to_string(), local_path.to_path_buf()));
    }

    fn save(&mut self) -> CoreResult<()> {
        let mut rig = self.0.borrow_mut();
        if rig.fail_save {
            return Err(AudioError::UploadFailed {
                reason: "offline".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        rig.saves += 1;
        Ok(())
    }
}

pub(crate) struct FakeAlerts(pub SharedRig);

impl AlertPresenter for FakeAlerts {
    fn present(&mut self, alert: &Alert) {
        self.0.borrow_mut().alerts.push(alert.clone());
    }
}

pub(crate) struct FakeTimer(pub SharedRig);

impl TickTimer for FakeTimer {
    fn start(&mut self) {
        let mut rig = self.0.borrow_mut();
        rig.timer_running = true;
        rig.timer_starts += 1;
    }

    fn stop(&mut self) {
        let mut rig = self.0.borrow_mut();
        rig.timer_running = false;
        rig.timer_stops += 1;
    }

    fn is_running(&self) -> bool {
        self.0.borrow().timer_running
    }
}

/// Controller wired to fakes, with its recordings directory in a temp dir.
pub(crate) struct Harness {
    pub rig: SharedRig,
    pub controller: SessionController,
    pub events: EventReceiver,
    pub dir: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_rig(Rig::default())
    }

    #[allow(clippy::unwrap_used)]
    pub fn with_rig(rig: Rig) -> Self {
        let rig = Rc::new(RefCell::new(rig));
        let dir = tempfile::tempdir().unwrap();
        let (events_tx, events) = mpsc::channel();

        let controller = SessionController::new(SessionParts {
            backend: Box::new(FakeBackend {
                rig: Rc::clone(&rig),
                events: events_tx,
            }),
            session_platform: Box::new(FakeSession(Rc::clone(&rig))),
            store: ArtifactStore::new(dir.path().join("recordings")),
            format: RecordingFormat::default(),
            limits: SessionLimits::default(),
            uploader: Box::new(FakeUploader(Rc::clone(&rig))),
            alerts: Box::new(FakeAlerts(Rc::clone(&rig))),
            timer: Box::new(FakeTimer(Rc::clone(&rig))),
        });

        Self {
            rig,
            controller,
            events,
            dir,
        }
    }

    /// Deliver pending device events, as the event loop would.
    pub fn deliver_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.controller.handle_event(event);
        }
    }

    pub fn set_capture_secs(&self, secs: u64) {
        self.rig.borrow_mut().capture_time = Duration::from_secs(secs);
    }

    pub fn set_playback_secs(&self, secs: u64) {
        self.rig.borrow_mut().playback_position = Duration::from_secs(secs);
    }

    /// Record for `secs`, stop by hand and deliver completion.
    pub fn record_manually(&mut self, secs: u64) {
        self.controller.on_record_button();
        self.set_capture_secs(secs);
        self.controller.on_tick();
        self.controller.on_record_button();
        self.deliver_events();
    }

    pub fn alert_messages(&self) -> Vec<String> {
        self.rig
            .borrow()
            .alerts
            .iter()
            .map(|alert| alert.message.clone())
            .collect()
    }
}
