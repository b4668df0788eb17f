use crate::commands::{CommandBinding, DogCommand};
use crate::error::{TrainerError, TrainerResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Commands (checked in this order)
    pub commands: Vec<CommandBinding>,
    pub voice_corrections: HashMap<String, String>,

    // Training
    pub trick: String,
    pub script_path: Option<String>,
    pub free_play: bool,
    pub timings: Timings,

    // Host loop
    pub tick_millis: u64,
    pub permission_poll_seconds: f64,
    pub permission_max_attempts: u32,

    // Meta
    pub log_level: String,
    pub journal_enabled: bool,
}

/// Every fixed delay of the training flow, in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub warmup: f64,
    pub feedback_seconds: f64,
    pub instruction_hold: f64,
    pub typing_interval: f64,
    pub animation_settle: f64,
    pub confusion_seconds: f64,
    pub level_advance_delay: f64,
    pub level_transition_delay: f64,
    pub restart_delay: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            warmup: 1.0,
            feedback_seconds: 2.0,
            instruction_hold: 3.0,
            typing_interval: 0.03,
            animation_settle: 1.5,
            confusion_seconds: 2.0,
            level_advance_delay: 5.0,
            level_transition_delay: 5.0,
            restart_delay: 3.0,
        }
    }
}

impl Timings {
    /// Timings with the typewriter effect disabled
    pub fn instant_text() -> Self {
        Self {
            typing_interval: 0.0,
            ..Self::default()
        }
    }

    pub fn warmup(&self) -> Duration {
        Duration::from_secs_f64(self.warmup)
    }

    pub fn feedback(&self) -> Duration {
        Duration::from_secs_f64(self.feedback_seconds)
    }

    pub fn instruction_hold(&self) -> Duration {
        Duration::from_secs_f64(self.instruction_hold)
    }

    pub fn typing_interval(&self) -> Duration {
        Duration::from_secs_f64(self.typing_interval)
    }

    pub fn animation_settle(&self) -> Duration {
        Duration::from_secs_f64(self.animation_settle)
    }

    pub fn confusion(&self) -> Duration {
        Duration::from_secs_f64(self.confusion_seconds)
    }

    pub fn level_advance_delay(&self) -> Duration {
        Duration::from_secs_f64(self.level_advance_delay)
    }

    pub fn level_transition_delay(&self) -> Duration {
        Duration::from_secs_f64(self.level_transition_delay)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs_f64(self.restart_delay)
    }

    /// Reject values that are not a representable non-negative duration
    pub fn validate(&self) -> TrainerResult<()> {
        let fields = [
            ("warmup", self.warmup),
            ("feedback_seconds", self.feedback_seconds),
            ("instruction_hold", self.instruction_hold),
            ("typing_interval", self.typing_interval),
            ("animation_settle", self.animation_settle),
            ("confusion_seconds", self.confusion_seconds),
            ("level_advance_delay", self.level_advance_delay),
            ("level_transition_delay", self.level_transition_delay),
            ("restart_delay", self.restart_delay),
        ];
        for (name, value) in fields {
            if !is_duration_seconds(value) {
                return Err(TrainerError::Config(format!(
                    "timing '{}' must be a non-negative number of seconds, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commands: vec![
                CommandBinding::new(DogCommand::Sit, &["sentado", "siéntate"]),
                CommandBinding::new(DogCommand::Paw, &["pata", "dame la pata", "la pata"]),
            ],
            voice_corrections: HashMap::new(),
            trick: "sit".to_string(),
            script_path: None,
            free_play: false,
            timings: Timings::default(),
            tick_millis: 50,
            permission_poll_seconds: 1.0,
            permission_max_attempts: 30,
            log_level: "INFO".to_string(),
            journal_enabled: true,
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> TrainerResult<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from a file; a corrupt file is backed up and replaced by defaults
    pub fn load_from(config_path: &Path) -> TrainerResult<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        let config = match serde_json::from_str::<Config>(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = config_path.with_extension("json.corrupt");
                let _ = std::fs::rename(config_path, &backup_path);
                return Ok(Self::default());
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> TrainerResult<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> TrainerResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> TrainerResult<()> {
        self.timings.validate()?;
        if self.commands.is_empty() {
            return Err(TrainerError::Config("no voice commands configured".into()));
        }
        if let Some(binding) = self.commands.iter().find(|b| b.triggers.is_empty()) {
            return Err(TrainerError::Config(format!(
                "command '{}' has no trigger phrases",
                binding.command
            )));
        }
        if !self.permission_poll_seconds.is_finite() || self.permission_poll_seconds < 0.0 {
            return Err(TrainerError::Config(
                "permission_poll_seconds must be non-negative".into(),
            ));
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1))
    }

    pub fn permission_poll(&self) -> Duration {
        Duration::from_secs_f64(self.permission_poll_seconds)
    }
}

/// True if `seconds` converts to a `Duration` without panicking
pub fn is_duration_seconds(seconds: f64) -> bool {
    Duration::try_from_secs_f64(seconds).is_ok()
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trufoso")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.trick, "sit");
        assert_eq!(config.commands.len(), 2);
        assert_eq!(config.commands[0].command, DogCommand::Sit);
        assert_eq!(config.timings.animation_settle, 1.5);
        assert_eq!(config.timings.level_advance_delay, 5.0);
        assert!(!config.free_play);
        assert!(config.voice_corrections.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let json = serde_json::to_string(&config).expect("Failed to serialize");
        let restored: Config = serde_json::from_str(&json).expect("Failed to deserialize");
        assert_eq!(config.trick, restored.trick);
        assert_eq!(config.timings, restored.timings);
        assert_eq!(restored.commands[1].triggers, config.commands[1].triggers);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let restored: Config =
            serde_json::from_str(r#"{ "free_play": true, "timings": { "warmup": 0.5 } }"#)
                .expect("Failed to deserialize");
        assert!(restored.free_play);
        assert_eq!(restored.timings.warmup, 0.5);
        assert_eq!(restored.timings.restart_delay, 3.0);
        assert_eq!(restored.commands.len(), 2);
    }

    #[test]
    fn test_negative_timing_rejected() {
        let mut config = Config::default();
        config.timings.restart_delay = -1.0;
        assert!(matches!(config.validate(), Err(TrainerError::Config(_))));
    }

    #[test]
    fn test_oversized_timing_rejected() {
        let mut config = Config::default();
        config.timings.feedback_seconds = 1e20;
        assert!(matches!(config.validate(), Err(TrainerError::Config(_))));
        config.timings.feedback_seconds = f64::NAN;
        assert!(matches!(config.validate(), Err(TrainerError::Config(_))));
    }

    #[test]
    fn test_oversized_timing_in_file_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "timings": { "feedback_seconds": 1e20 } }"#)
            .expect("Failed to write");

        assert!(matches!(
            Config::load_from(&path),
            Err(TrainerError::Config(_))
        ));
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not valid json").expect("Failed to write");

        let config = Config::load_from(&path).expect("Load should degrade gracefully");
        assert_eq!(config.trick, "sit");
        assert!(dir.path().join("config.json.corrupt").exists());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("nested/config.json");

        let mut config = Config::default();
        config.trick = "paw".to_string();
        config.save_to(&path).expect("Failed to save");

        let loaded = Config::load_from(&path).expect("Failed to load");
        assert_eq!(loaded.trick, "paw");
    }
}
