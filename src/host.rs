//! Terminal host commands
//!
//! Lines typed by the user stand in for the app's touch and speech input.
//! Anything that is not a host command is treated as recognized speech.

use crate::script::ButtonId;
use tracing::warn;

pub const HELP: &str = "Commands: say <text> | partial <text> | click <galleta|acariciar|pelota> | \
start | menu | status | help | quit  (plain text counts as speech)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCommand {
    /// Final speech result
    Say(String),
    /// Partial speech result
    Partial(String),
    Click(ButtonId),
    /// Start (or restart) the training
    Start,
    /// Back out to the menu, tearing the session down
    Menu,
    Status,
    Help,
    Quit,
}

impl HostCommand {
    /// Parse one input line. Blank lines and bad clicks yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head.to_lowercase().as_str() {
            "say" | "di" if !rest.is_empty() => Some(HostCommand::Say(rest.to_string())),
            "partial" if !rest.is_empty() => Some(HostCommand::Partial(rest.to_string())),
            "say" | "di" | "partial" => {
                warn!("⚠️ '{}' needs some text", head);
                None
            }
            "click" | "clic" => match rest.parse::<ButtonId>() {
                Ok(button) => Some(HostCommand::Click(button)),
                Err(e) => {
                    warn!("⚠️ {}", e);
                    None
                }
            },
            "start" | "play" if rest.is_empty() => Some(HostCommand::Start),
            "menu" if rest.is_empty() => Some(HostCommand::Menu),
            "status" if rest.is_empty() => Some(HostCommand::Status),
            "help" | "?" if rest.is_empty() => Some(HostCommand::Help),
            "quit" | "exit" | "salir" if rest.is_empty() => Some(HostCommand::Quit),
            _ => Some(HostCommand::Say(line.to_string())),
        }
    }
}
