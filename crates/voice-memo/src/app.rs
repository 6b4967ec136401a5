use crate::{AppCommand, AppResult, TerminalView};

use std::time::Duration;

use tokio::{
    sync::{mpsc, watch},
    time::{Interval, MissedTickBehavior},
};
use tracing::{debug, error, info, instrument, warn};
use voice_memo_core::{EventReceiver, Mode, SessionController};

/// Main application state.
///
/// Runs on a current-thread runtime inside a `LocalSet`: the controller
/// owns `!Send` audio streams and must stay on this thread. User commands,
/// device completion events and ticks are all handled by the one loop in
/// [`run`](Self::run).
pub struct App {
    pub(crate) controller: SessionController,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
    pub(crate) events: EventReceiver,
    pub(crate) ticking_rx: watch::Receiver<bool>,
    pub(crate) tick_interval: Duration,
    pub(crate) shutdown_tx: watch::Sender<bool>,
    pub(crate) view: TerminalView,
}

impl App {
    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(self) -> AppResult<()> {
        info!("Voice Memo starting");
        println!("{}", AppCommand::USAGE);

        let App {
            mut controller,
            mut command_rx,
            events,
            ticking_rx,
            tick_interval,
            shutdown_tx,
            mut view,
        } = self;

        // Device events arrive on a std channel from audio threads. A single
        // blocking task forwards them into the async loop; it ends when the
        // controller (holding every sender) is dropped or the loop's
        // receiver goes away.
        let (event_tx, mut event_rx) = mpsc::channel(32);
        let event_handle = tokio::task::spawn_blocking(move || {
            while let Ok(event) = events.recv() {
                if event_tx.blocking_send(event).is_err() {
                    break;
                }
            }
        });

        let mut interval = tick_timer(tick_interval);
        let mut was_ticking = *ticking_rx.borrow();

        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        view.render(controller.mode(), controller.display());

        loop {
            let ticking = *ticking_rx.borrow();
            if ticking && !was_ticking {
                // First tick one period after recording or playback starts.
                interval.reset();
            }
            was_ticking = ticking;

            tokio::select! {
                Some(cmd) = command_rx.recv() => {
                    debug!(?cmd, "Command received");
                    match cmd {
                        AppCommand::Record => controller.on_record_button(),
                        AppCommand::Play => controller.on_play_button(),
                        AppCommand::Save => controller.on_save_tapped(),
                        AppCommand::Quit => {
                            info!("Shutdown requested");
                            break;
                        }
                    }
                }

                Some(event) = event_rx.recv() => {
                    debug!(?event, "Device event received");
                    controller.handle_event(event);
                }

                _ = interval.tick(), if ticking => {
                    controller.on_tick();
                }

                result = &mut ctrl_c => {
                    if let Err(e) = result {
                        error!(error = ?e, "Failed to listen for Ctrl+C");
                    }
                    info!("Interrupted, shutting down");
                    break;
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }

            view.render(controller.mode(), controller.display());
        }

        match controller.mode() {
            Mode::Recording => {
                warn!("Stopping unsaved recording on exit");
                controller.on_record_button();
            }
            Mode::Playing => controller.on_play_button(),
            Mode::Idle => {}
        }

        let _ = shutdown_tx.send(true);

        // Dropping the controller drops the device event senders, which
        // ends the forwarder's blocking recv().
        drop(controller);
        drop(event_rx);

        match tokio::time::timeout(Duration::from_secs(1), event_handle).await {
            Ok(Ok(())) => debug!("Device event forwarder stopped cleanly"),
            Ok(Err(e)) => error!(error = ?e, "Device event forwarder task panicked"),
            Err(_) => debug!(
                "Device event forwarder did not stop within timeout, \
                 will be cleaned up on exit"
            ),
        }

        info!("Voice Memo shut down successfully");

        Ok(())
    }
}

fn tick_timer(period: Duration) -> Interval {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}
