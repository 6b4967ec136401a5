use crate::{
    AudioError, CoreResult,
    audio::{SessionCategory, SessionPlatform},
};

use std::{cell::RefCell, fmt, panic::Location, rc::Rc};

use error_location::ErrorLocation;
use tracing::{debug, instrument, warn};

/// Component currently holding the audio session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionHolder {
    /// Held by the recorder while capturing.
    Recorder,
    /// Held by the player while playing.
    Player,
}

impl fmt::Display for SessionHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionHolder::Recorder => write!(f, "recorder"),
            SessionHolder::Player => write!(f, "player"),
        }
    }
}

struct SessionInner {
    platform: Box<dyn SessionPlatform>,
    holder: Option<SessionHolder>,
}

/// Shared handle to the exclusive audio hardware session.
///
/// Cloning is cheap; all clones refer to the same session. The handle is
/// single-threaded (`!Send`) like the event loop that owns it.
#[derive(Clone)]
pub struct AudioSession {
    inner: Rc<RefCell<SessionInner>>,
}

impl AudioSession {
    /// Wrap a platform session.
    pub fn new(platform: Box<dyn SessionPlatform>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(SessionInner {
                platform,
                holder: None,
            })),
        }
    }

    /// Request the play-and-record category.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn configure(&self) -> CoreResult<()> {
        let location = Location::caller();
        self.inner
            .borrow_mut()
            .platform
            .set_category(SessionCategory::PlayAndRecord)
            .map_err(|e| AudioError::SessionActivationFailed {
                source: Box::new(e),
                location: ErrorLocation::from(location),
            })
    }

    /// Current holder, if any.
    pub fn holder(&self) -> Option<SessionHolder> {
        self.inner.borrow().holder
    }

    /// Activate the session for `holder`.
    ///
    /// The returned lease deactivates the session when dropped.
    ///
    /// # Errors
    ///
    /// Fails if another holder owns the session or the platform refuses activation.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn acquire(&self, holder: SessionHolder) -> CoreResult<SessionLease> {
        let location = Location::caller();
        let mut inner = self.inner.borrow_mut();

        if let Some(current) = inner.holder {
            return Err(AudioError::SessionActivationFailed {
                source: Box::new(AudioError::DeviceError {
                    reason: format!("Audio session already held by {}", current),
                    location: ErrorLocation::from(location),
                }),
                location: ErrorLocation::from(location),
            });
        }

        inner
            .platform
            .set_active(true)
            .map_err(|e| AudioError::SessionActivationFailed {
                source: Box::new(e),
                location: ErrorLocation::from(location),
            })?;
        inner.holder = Some(holder);

        debug!(%holder, "Audio session acquired");

        Ok(SessionLease {
            session: self.clone(),
            holder,
        })
    }

    fn release(&self, holder: SessionHolder) {
        let mut inner = self.inner.borrow_mut();
        if inner.holder != Some(holder) {
            return;
        }
        inner.holder = None;

        // Best effort: the holder is cleared even if the platform refuses.
        if let Err(e) = inner.platform.set_active(false) {
            warn!(%holder, error = ?e, "Audio session deactivation failed");
        } else {
            debug!(%holder, "Audio session released");
        }
    }
}

/// RAII token proving ownership of the audio session.
///
/// Dropping the lease deactivates the session, so every exit path (normal
/// stop, error return, component drop) releases it exactly once.
pub struct SessionLease {
    session: AudioSession,
    holder: SessionHolder,
}

impl SessionLease {
    /// Component owning this lease.
    pub fn holder(&self) -> SessionHolder {
        self.holder
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        self.session.release(self.holder);
    }
}
