//! UI surface
//!
//! The sequencer only ever writes to the UI: text fields, button visibility and
//! reward model visibility. It never reads UI state back.

use crate::script::{ButtonId, RewardModel};
use tracing::{debug, info};

/// Text fields the sequencer writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Instruction,
    Feedback,
    Level,
}

/// Trait for UI backends
pub trait UiSurface: Send {
    fn set_text(&mut self, field: TextField, text: &str);

    fn set_button_visible(&mut self, button: ButtonId, visible: bool);

    fn set_model_visible(&mut self, model: RewardModel, visible: bool);

    /// Called once an instruction has been fully typed out.
    /// Default implementation does nothing.
    fn instruction_revealed(&mut self, text: &str) {
        let _ = text;
    }
}

/// Terminal UI that logs every change
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl ConsoleUi {
    pub fn new() -> Self {
        Self
    }
}

impl UiSurface for ConsoleUi {
    fn set_text(&mut self, field: TextField, text: &str) {
        match field {
            // Partial typewriter frames; the full line is logged on reveal
            TextField::Instruction => {}
            TextField::Feedback if text.is_empty() => debug!("Feedback cleared"),
            TextField::Feedback => info!("💬 {}", text),
            TextField::Level => info!("🏅 {}", text),
        }
    }

    fn set_button_visible(&mut self, button: ButtonId, visible: bool) {
        if visible {
            info!("🔘 Button '{}' available (type: click {})", button, button);
        } else {
            debug!("Button '{}' hidden", button);
        }
    }

    fn set_model_visible(&mut self, model: RewardModel, visible: bool) {
        if visible {
            let glyph = match model {
                RewardModel::Question => "❓",
                RewardModel::Exclamation => "❗",
                RewardModel::Heart => "❤️",
            };
            info!("{} {:?}", glyph, model);
        }
    }

    fn instruction_revealed(&mut self, text: &str) {
        info!("📋 {}", text);
    }
}
