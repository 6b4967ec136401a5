//! Voice Memo: record, review and save short voice memos from the terminal.

mod app;
mod app_command;
mod config;
mod error;
mod input_handler;
mod outbox;
mod terminal;
mod watch_timer;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    input_handler::InputHandler,
    outbox::OutboxUploader,
    terminal::{TerminalAlerts, TerminalView},
    watch_timer::WatchTimer,
};

use crate::config::Config;

use std::time::Duration;

use tokio::{
    io::BufReader,
    sync::{mpsc, watch},
    task::LocalSet,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use voice_memo_core::{
    ArtifactStore, DesktopBackend, DesktopSession, SessionController, SessionParts,
};

/// Log filter used when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "voice_memo=debug,voice_memo_core=debug";

/// Application entry point.
fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = config.validate() {
        error!("Config validation failed: {:?}", e);
        std::process::exit(1);
    }

    // The controller owns cpal/rodio streams, which are !Send: everything
    // runs on this thread inside a LocalSet.
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", AppError::from(e));
            std::process::exit(1);
        }
    };

    let local = LocalSet::new();
    local.block_on(&rt, run(config));

    // Stdin reads happen on a blocking thread that only returns on the next
    // line; do not wait for it.
    rt.shutdown_timeout(Duration::from_millis(250));
}

async fn run(config: Config) {
    info!(
        recordings_dir = ?config.storage.recordings_dir,
        outbox_dir = ?config.storage.outbox_dir,
        max_duration_secs = config.recording.max_duration_secs,
        "Configuration ready"
    );

    let (events_tx, events_rx) = std::sync::mpsc::channel();
    let (timer, ticking_rx) = WatchTimer::new();
    let (command_tx, command_rx) = mpsc::channel(32);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let controller = SessionController::new(SessionParts {
        backend: Box::new(DesktopBackend::new(events_tx)),
        session_platform: Box::new(DesktopSession::default()),
        store: ArtifactStore::new(config.storage.recordings_dir.clone()),
        format: config.recording.format(),
        limits: config.recording.limits(),
        uploader: Box::new(OutboxUploader::new(config.storage.outbox_dir.clone())),
        alerts: Box::new(TerminalAlerts),
        timer: Box::new(timer),
    });

    let app = App {
        controller,
        command_rx,
        events: events_rx,
        ticking_rx,
        tick_interval: config.recording.tick_interval(),
        shutdown_tx,
        view: TerminalView::default(),
    };

    let input_handler = InputHandler::new(command_tx);

    tokio::join!(
        async {
            let stdin = BufReader::new(tokio::io::stdin());
            if let Err(e) = input_handler.run(stdin, shutdown_rx).await {
                error!(error = ?e, "Input handler error");
            }
        },
        async {
            if let Err(e) = app.run().await {
                error!(error = ?e, "App error");
            }
        }
    );
}
