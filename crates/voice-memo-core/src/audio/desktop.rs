use crate::{
    AudioError, CoreResult, EventSender,
    audio::{
        AudioBackend, CaptureDevice, CpalCaptureDevice, PlaybackDevice, RodioPlaybackDevice,
        SessionCategory, SessionPlatform,
    },
};

use std::{panic::Location, path::Path};

use cpal::traits::HostTrait;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Desktop stand-in for a mobile audio session.
///
/// Desktop hosts have no session categories; configuring play-and-record
/// checks that both an input and an output device are present.
#[derive(Debug, Default)]
pub struct DesktopSession {
    active: bool,
}

impl SessionPlatform for DesktopSession {
    #[track_caller]
    #[instrument(skip(self))]
    fn set_category(&mut self, category: SessionCategory) -> CoreResult<()> {
        let host = cpal::default_host();

        match category {
            SessionCategory::PlayAndRecord => {
                if host.default_input_device().is_none() {
                    return Err(AudioError::DeviceError {
                        reason: "No microphone found".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
                if host.default_output_device().is_none() {
                    return Err(AudioError::DeviceError {
                        reason: "No output device found".to_string(),
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            }
        }

        debug!(?category, "Session category set");

        Ok(())
    }

    fn set_active(&mut self, active: bool) -> CoreResult<()> {
        self.active = active;
        debug!(active, "Session activation changed");
        Ok(())
    }
}

/// cpal capture and rodio playback.
pub struct DesktopBackend {
    events: EventSender,
}

impl DesktopBackend {
    /// Devices created by this backend report completion on `events`.
    pub fn new(events: EventSender) -> Self {
        info!("Desktop audio backend initialized");
        Self { events }
    }
}

impl AudioBackend for DesktopBackend {
    fn open_capture(&mut self) -> CoreResult<Box<dyn CaptureDevice>> {
        Ok(Box::new(CpalCaptureDevice::new(self.events.clone())?))
    }

    fn open_playback(&mut self, path: &Path) -> CoreResult<Box<dyn PlaybackDevice>> {
        Ok(Box::new(RodioPlaybackDevice::open(path, self.events.clone())?))
    }
}
