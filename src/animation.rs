//! Animation player
//!
//! The sequencer fires command animations and resets the dog to its idle pose.
//! It enforces its own settle cooldown instead of asking the player whether an
//! animation finished.

use crate::commands::DogCommand;
use tracing::info;

/// Trait for character animation backends
pub trait AnimationPlayer: Send {
    /// Play the animation for a command
    fn trigger(&mut self, command: DogCommand);

    /// Return to the initial pose
    fn reset_to_idle(&mut self);
}

/// Animation player that only logs
#[derive(Debug, Default)]
pub struct LoggingAnimator;

impl AnimationPlayer for LoggingAnimator {
    fn trigger(&mut self, command: DogCommand) {
        let action = match command {
            DogCommand::Sit => "sits down",
            DogCommand::Paw => "gives the paw",
        };
        info!("🐕 The dog {}", action);
    }

    fn reset_to_idle(&mut self) {
        info!("🐕 The dog stands up");
    }
}
