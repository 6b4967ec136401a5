//! Terminal front-end: status line rendering and alert presentation.

use tracing::{info, warn};
use voice_memo_core::{Alert, AlertPresenter, DisplayState, Mode};

/// Prints alerts to the terminal.
#[derive(Debug, Default)]
pub struct TerminalAlerts;

impl AlertPresenter for TerminalAlerts {
    fn present(&mut self, alert: &Alert) {
        if alert.title == Alert::ERROR_TITLE {
            warn!(title = %alert.title, message = %alert.message, "Alert presented");
        } else {
            info!(title = %alert.title, message = %alert.message, "Alert presented");
        }
        println!(
            "[{}] {} ({})",
            alert.title, alert.message, alert.acknowledge_label
        );
    }
}

/// Prints the session status whenever it changes.
#[derive(Debug, Default)]
pub struct TerminalView {
    last: Option<String>,
}

impl TerminalView {
    /// Print the status line if it differs from the last one printed.
    pub fn render(&mut self, mode: Mode, display: &DisplayState) {
        let line = Self::status_line(mode, display);
        if self.last.as_deref() != Some(line.as_str()) {
            println!("{}", line);
            self.last = Some(line);
        }
    }

    /// One-line summary of the mode, timer and enabled buttons.
    pub fn status_line(mode: Mode, display: &DisplayState) -> String {
        let mut line = format!("{:<9}", mode.to_string());

        if display.timer_visible {
            line.push_str(&format!(" {}", display.timer_text));
            if display.warning {
                line.push_str(" !");
            }
        }

        let mut buttons = Vec::new();
        if display.play_enabled {
            buttons.push(format!("[p] {}", display.play_label));
        }
        if display.save_enabled {
            buttons.push("[s] Save".to_string());
        }
        if !buttons.is_empty() {
            line.push_str("  ");
            line.push_str(&buttons.join(" "));
        }

        line
    }
}
