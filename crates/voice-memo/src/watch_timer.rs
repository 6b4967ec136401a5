use tokio::sync::watch;
use tracing::trace;
use voice_memo_core::TickTimer;

/// Tick timer backed by a `watch` flag.
///
/// The controller flips the flag; the event loop polls its interval only
/// while the flag is set.
pub struct WatchTimer {
    running_tx: watch::Sender<bool>,
}

impl WatchTimer {
    /// Create a stopped timer and the receiver the event loop observes.
    pub fn new() -> (Self, watch::Receiver<bool>) {
        let (running_tx, running_rx) = watch::channel(false);
        (Self { running_tx }, running_rx)
    }
}

impl TickTimer for WatchTimer {
    fn start(&mut self) {
        self.running_tx.send_replace(true);
        trace!("Tick timer started");
    }

    fn stop(&mut self) {
        self.running_tx.send_replace(false);
        trace!("Tick timer stopped");
    }

    fn is_running(&self) -> bool {
        *self.running_tx.borrow()
    }
}
