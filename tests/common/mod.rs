#![allow(dead_code)]

pub mod mock_animator;
pub mod mock_ui;

pub use mock_animator::MockAnimator;
pub use mock_ui::{MockUi, UiEvent};

use std::time::Duration;
use trufoso::config::Timings;
use trufoso::script::TrainingScript;
use trufoso::sequencer::{Phase, Sequencer};

/// Sequencer wired to fresh mocks, typewriter off
pub fn sequencer(script: TrainingScript) -> (Sequencer, MockUi, MockAnimator) {
    let ui = MockUi::new();
    let animator = MockAnimator::new();
    let seq = Sequencer::builder()
        .script(script)
        .ui(ui.clone())
        .animator(animator.clone())
        .timings(Timings::instant_text())
        .build()
        .expect("Failed to build sequencer");
    (seq, ui, animator)
}

pub fn secs(s: f64) -> Duration {
    Duration::from_secs_f64(s)
}

/// Start and run through the warm-up into level 1, step 1
pub fn started(script: TrainingScript) -> (Sequencer, MockUi, MockAnimator) {
    let (mut seq, ui, animator) = sequencer(script);
    seq.start();
    seq.advance_time(secs(1.0));
    (seq, ui, animator)
}

/// Answer every step of the current level until its finale is on screen.
/// Waits out the settle cooldown between voice steps. Returns the step
/// numbers seen along the way.
pub fn play_level(seq: &mut Sequencer) -> Vec<usize> {
    let mut steps = vec![seq.step()];
    loop {
        match seq.phase() {
            Phase::AwaitingVoice { command, .. } => {
                seq.advance_time(secs(2.0));
                seq.on_voice_command(command);
            }
            Phase::AwaitingButton(button) => {
                assert!(seq.on_button_clicked(button));
            }
            Phase::ShowingReward => return steps,
            other => panic!("Unexpected phase while playing a level: {:?}", other),
        }
        steps.push(seq.step());
    }
}
