//! Mock animation player for testing

use std::sync::{Arc, Mutex};
use trufoso::animation::AnimationPlayer;
use trufoso::commands::DogCommand;

/// Records triggered animations and idle resets
#[derive(Debug, Clone, Default)]
pub struct MockAnimator {
    pub triggered: Arc<Mutex<Vec<DogCommand>>>,
    pub resets: Arc<Mutex<usize>>,
}

impl MockAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn triggered(&self) -> Vec<DogCommand> {
        self.triggered.lock().unwrap().clone()
    }

    pub fn resets(&self) -> usize {
        *self.resets.lock().unwrap()
    }
}

impl AnimationPlayer for MockAnimator {
    fn trigger(&mut self, command: DogCommand) {
        self.triggered.lock().unwrap().push(command);
    }

    fn reset_to_idle(&mut self) {
        *self.resets.lock().unwrap() += 1;
    }
}
