use chrono::{DateTime, Local};
use serde::Serialize;

pub type CommandHandlerPointer = Box<dyn CommandHandler + Send>;

/// Receives accepted operator commands.
///
/// Fire and forget: there is no acknowledgement or response path.
pub trait CommandHandler {
    fn on_command(&mut self, command: &str);
}

impl<F: FnMut(&str)> CommandHandler for F {
    fn on_command(&mut self, command: &str) {
        self(command)
    }
}

/// A command as shown in the terminal log.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CommandLogEntry {
    pub command: String,
    pub submitted_at: DateTime<Local>,
}

impl CommandLogEntry {
    pub fn display_line(&self) -> String {
        format!("> {}", self.command)
    }
}

/// Accepts operator commands, logs them and forwards them to the handler.
pub struct CommandSink {
    handler: CommandHandlerPointer,
    log: Vec<CommandLogEntry>,
}

impl CommandSink {
    pub fn new(handler: CommandHandlerPointer) -> Self {
        Self {
            handler,
            log: Vec::new(),
        }
    }

    /// Submits `command` after trimming it.
    ///
    /// Blank input is ignored and `false` is returned; nothing is logged and the
    /// handler is not called.
    pub fn submit(&mut self, command: &str) -> bool {
        let command = command.trim();
        if command.is_empty() {
            return false;
        }

        log::debug!("Accepted command {command:?}");
        self.log.push(CommandLogEntry {
            command: command.to_string(),
            submitted_at: Local::now(),
        });
        self.handler.on_command(command);

        true
    }

    pub fn log(&self) -> &[CommandLogEntry] {
        &self.log
    }

    pub fn display_lines(&self) -> impl Iterator<Item = String> + '_ {
        self.log.iter().map(CommandLogEntry::display_line)
    }
}
