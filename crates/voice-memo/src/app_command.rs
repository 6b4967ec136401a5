/// Commands sent from the input handler to the main application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Record button: start or stop recording.
    Record,
    /// Play button: start or pause playback.
    Play,
    /// Save button: upload the staged recording.
    Save,
    /// Request application shutdown.
    Quit,
}

impl AppCommand {
    /// Help line listing the accepted inputs.
    pub const USAGE: &'static str = "commands: r = record/stop, p = play/pause, s = save, q = quit";

    /// Parse one line of terminal input. Blank or unknown input yields `None`.
    pub fn from_line(line: &str) -> Option<Self> {
        match line.trim().to_ascii_lowercase().as_str() {
            "r" | "record" | "stop" => Some(AppCommand::Record),
            "p" | "play" | "pause" => Some(AppCommand::Play),
            "s" | "save" => Some(AppCommand::Save),
            "q" | "quit" | "exit" => Some(AppCommand::Quit),
            _ => None,
        }
    }
}
