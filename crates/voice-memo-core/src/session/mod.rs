mod collaborators;
mod controller;
mod display;
mod event;
mod limits;
mod mode;

pub use {
    collaborators::{Alert, AlertPresenter, TickTimer, UploadClient},
    controller::{SessionController, SessionParts},
    display::{DisplayState, ElapsedTime, PlayLabel},
    event::{EventReceiver, EventSender, SessionEvent},
    limits::{DEFAULT_MAX_DURATION_SECS, SessionLimits, WARNING_WINDOW_SECS},
    mode::Mode,
};
