//! Terminal input handler.
//!
//! Reads one command per line and forwards it to the main application over
//! an async channel. End of input is treated as a quit request.

use crate::{AppCommand, AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::{mpsc, watch},
};
use tracing::{debug, info, instrument, warn};

/// Line-oriented command reader.
pub struct InputHandler {
    command_tx: mpsc::Sender<AppCommand>,
}

impl InputHandler {
    /// Create a handler that sends parsed commands on `command_tx`.
    pub fn new(command_tx: mpsc::Sender<AppCommand>) -> Self {
        Self { command_tx }
    }

    /// Read commands from `reader` until end of input, a quit command or a
    /// shutdown signal.
    #[instrument(skip(self, reader, shutdown_rx))]
    pub async fn run<R>(&self, reader: R, mut shutdown_rx: watch::Receiver<bool>) -> AppResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    info!("Input handler shutting down");
                    break;
                }
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        info!("End of input, requesting shutdown");
                        self.send(AppCommand::Quit).await?;
                        break;
                    };

                    if line.trim().is_empty() {
                        continue;
                    }

                    match AppCommand::from_line(&line) {
                        Some(cmd) => {
                            self.send(cmd).await?;
                            if cmd == AppCommand::Quit {
                                break;
                            }
                        }
                        None => {
                            warn!(input = %line.trim(), "Unknown command");
                            println!("{}", AppCommand::USAGE);
                        }
                    }
                }
            }
        }

        Ok(())
    }

    async fn send(&self, cmd: AppCommand) -> AppResult<()> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|e| AppError::ChannelSendFailed {
                message: format!("Failed to send {:?}: {}", cmd, e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(?cmd, "Command sent");

        Ok(())
    }
}
