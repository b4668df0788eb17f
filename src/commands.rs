//! Command dispatching module
//!
//! Maps recognized speech to dog commands by trigger-phrase containment.

use crate::config::Config;
use crate::core::text_normalizer::TextNormalizer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// A command the dog can be trained to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DogCommand {
    Sit,
    Paw,
}

impl DogCommand {
    pub fn name(&self) -> &'static str {
        match self {
            DogCommand::Sit => "sit",
            DogCommand::Paw => "paw",
        }
    }

    /// Feedback line shown when the command's animation fires
    pub fn feedback(&self) -> &'static str {
        match self {
            DogCommand::Sit => "¡Sentado!",
            DogCommand::Paw => "¡Dame la pata!",
        }
    }
}

impl fmt::Display for DogCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A voice command binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandBinding {
    pub command: DogCommand,
    /// Voice phrases that trigger this command
    pub triggers: Vec<String>,
}

impl CommandBinding {
    pub fn new(command: DogCommand, triggers: &[&str]) -> Self {
        Self {
            command,
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Resolves recognized text to a command; bindings are checked in insertion order
pub struct CommandDispatcher {
    bindings: Vec<CommandBinding>,
    normalizer: TextNormalizer,
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl CommandDispatcher {
    pub fn new(normalizer: TextNormalizer) -> Self {
        Self {
            bindings: Vec::new(),
            normalizer,
        }
    }

    /// Build a dispatcher with the configured bindings and voice corrections
    pub fn from_config(config: &Config) -> Self {
        let mut dispatcher = Self::new(TextNormalizer::new(config.voice_corrections.clone()));
        for binding in &config.commands {
            dispatcher.add_binding(binding.clone());
        }
        dispatcher
    }

    /// Add a command binding at the lowest priority
    pub fn add_binding(&mut self, mut binding: CommandBinding) {
        binding.triggers = binding
            .triggers
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        info!("  {} <- {}", binding.command, binding.triggers.join(", "));
        self.bindings.push(binding);
    }

    pub fn bindings(&self) -> &[CommandBinding] {
        &self.bindings
    }

    /// Resolve recognized text to the first command whose phrases it contains
    pub fn dispatch(&self, text: &str) -> Option<DogCommand> {
        let normalized = self.normalizer.normalize(text);
        if normalized.is_empty() {
            return None;
        }

        for binding in &self.bindings {
            if let Some(trigger) = binding.triggers.iter().find(|t| normalized.contains(t.as_str())) {
                info!("🎯 Matched command: {} (trigger: '{}')", binding.command, trigger);
                return Some(binding.command);
            }
        }

        debug!("No command matched for: '{}'", normalized);
        None
    }

    /// Trigger phrases per command, for help output
    pub fn phrase_table(&self) -> HashMap<DogCommand, Vec<String>> {
        let mut table: HashMap<DogCommand, Vec<String>> = HashMap::new();
        for binding in &self.bindings {
            table
                .entry(binding.command)
                .or_default()
                .extend(binding.triggers.iter().cloned());
        }
        table
    }
}
