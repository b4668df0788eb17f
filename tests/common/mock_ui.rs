//! Mock UI surface for testing
//!
//! Records every write for verification.

use std::sync::{Arc, Mutex};
use trufoso::script::{ButtonId, RewardModel};
use trufoso::ui::{TextField, UiSurface};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Text(TextField, String),
    Button(ButtonId, bool),
    Model(RewardModel, bool),
    Revealed(String),
}

/// Mock UI that records all writes; clones share the same log
#[derive(Debug, Clone, Default)]
pub struct MockUi {
    pub events: Arc<Mutex<Vec<UiEvent>>>,
}

impl MockUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Current content of a text field
    pub fn text(&self, field: TextField) -> String {
        self.events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|e| match e {
                UiEvent::Text(f, text) if *f == field => Some(text.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Every non-empty text written to a field, in order
    pub fn history(&self, field: TextField) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| match e {
                UiEvent::Text(f, text) if *f == field && !text.is_empty() => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn button_visible(&self, button: ButtonId) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|e| match e {
                UiEvent::Button(b, visible) if *b == button => Some(*visible),
                _ => None,
            })
            .unwrap_or(false)
    }

    pub fn model_visible(&self, model: RewardModel) -> bool {
        self.events
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|e| match e {
                UiEvent::Model(m, visible) if *m == model => Some(*visible),
                _ => None,
            })
            .unwrap_or(false)
    }
}

impl UiSurface for MockUi {
    fn set_text(&mut self, field: TextField, text: &str) {
        self.events
            .lock()
            .unwrap()
            .push(UiEvent::Text(field, text.to_string()));
    }

    fn set_button_visible(&mut self, button: ButtonId, visible: bool) {
        self.events
            .lock()
            .unwrap()
            .push(UiEvent::Button(button, visible));
    }

    fn set_model_visible(&mut self, model: RewardModel, visible: bool) {
        self.events.lock().unwrap().push(UiEvent::Model(model, visible));
    }

    fn instruction_revealed(&mut self, text: &str) {
        self.events
            .lock()
            .unwrap()
            .push(UiEvent::Revealed(text.to_string()));
    }
}
