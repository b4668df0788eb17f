//! Training Sequencer
//!
//! Drives a [`TrainingScript`] one step at a time. Each step shows an
//! instruction and waits for one input: a voice command or a button click.
//! Satisfying the input shows feedback and moves to the next step; the last
//! step of a level is a finale that schedules the next level, and the last
//! level loops back to level 1.
//!
//! All waiting is expressed as timers on a [`Scheduler`]; the host calls
//! [`Sequencer::advance_time`] from its loop and pushes input events in
//! arrival order. Nothing here blocks or spawns.
//!
//! Two guards are independent of each other:
//! - the step guard: input is only accepted by the step waiting for it;
//! - the settle cooldown: after an animation fires, further animation
//!   triggers are suppressed until `animation_settle` has elapsed. It never
//!   stops a step from advancing.

use crate::animation::AnimationPlayer;
use crate::commands::{CommandDispatcher, DogCommand};
use crate::config::{Config, Timings};
use crate::error::{TrainerError, TrainerResult};
use crate::journal::Journal;
use crate::scheduler::{Scheduler, TimerHandle};
use crate::script::{ButtonId, Reward, RewardModel, StepKind, TrainingScript};
use crate::ui::{TextField, UiSurface};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const CONFUSION_FEEDBACK: &str = "¿?";
const SIT_FIRST_FEEDBACK: &str = "¡Primero siéntate!";
const ADVANCING_MESSAGE: &str = "Avanzando de nivel...";
const RESTART_MESSAGE: &str = "Reiniciando entrenamiento...";

/// Where the sequencer is in the script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingVoice { command: DogCommand, understood: bool },
    AwaitingButton(ButtonId),
    /// Finale of a level is on screen
    ShowingReward,
    /// Between levels
    AdvancingLevel,
    /// Last level done, waiting to restart
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::AwaitingVoice { command, .. } => write!(f, "waiting for '{}'", command),
            Phase::AwaitingButton(button) => write!(f, "waiting for click on '{}'", button),
            Phase::ShowingReward => write!(f, "level finale"),
            Phase::AdvancingLevel => write!(f, "advancing level"),
            Phase::Finished => write!(f, "training finished"),
        }
    }
}

/// Pose implied by the animations triggered so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DogPose {
    Standing,
    Sitting,
}

/// What happened to a piece of recognized speech
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceOutcome {
    /// No command phrase in the text
    Unrecognized,
    /// The current step was waiting for this command
    StepSatisfied(DogCommand),
    /// Executed outside a voice step
    FreePlay(DogCommand),
    /// Recognized but not wanted right now
    Ignored(DogCommand),
}

/// Read-only view handed to collaborators
#[derive(Debug, Clone, PartialEq)]
pub struct SequencerSnapshot {
    pub script: String,
    pub level: usize,
    pub step: usize,
    pub phase: Phase,
    pub instruction: String,
    pub animation_in_flight: bool,
    pub pose: DogPose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimerEvent {
    StartLevel(usize),
    LevelComplete,
    Restart,
    AnimationSettled,
    HideFeedback,
    TypeInstruction,
    InstructionHeld,
    HideModel(RewardModel),
}

#[derive(Debug)]
struct SequencerState {
    level: usize,
    step: usize,
    phase: Phase,
    animation_in_flight: bool,
    pose: DogPose,
    instruction: String,
    revealed: usize,
    feedback_timer: Option<TimerHandle>,
    instruction_timer: Option<TimerHandle>,
    model_timers: HashMap<RewardModel, TimerHandle>,
    flow_timer: Option<TimerHandle>,
}

impl Default for SequencerState {
    fn default() -> Self {
        Self {
            level: 1,
            step: 0,
            phase: Phase::Idle,
            animation_in_flight: false,
            pose: DogPose::Standing,
            instruction: String::new(),
            revealed: 0,
            feedback_timer: None,
            instruction_timer: None,
            model_timers: HashMap::new(),
            flow_timer: None,
        }
    }
}

/// Collects the sequencer's collaborators; a missing one is a startup error
#[derive(Default)]
pub struct SequencerBuilder {
    script: Option<TrainingScript>,
    ui: Option<Box<dyn UiSurface>>,
    animator: Option<Box<dyn AnimationPlayer>>,
    dispatcher: Option<CommandDispatcher>,
    timings: Timings,
    free_play: bool,
    journal: Option<Journal>,
}

impl SequencerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher, timings, free play and journal from config
    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::new()
            .dispatcher(CommandDispatcher::from_config(config))
            .timings(config.timings.clone())
            .free_play(config.free_play);
        if config.journal_enabled {
            builder = builder.journal(Journal::default_location());
        }
        builder
    }

    pub fn script(mut self, script: TrainingScript) -> Self {
        self.script = Some(script);
        self
    }

    pub fn ui(mut self, ui: impl UiSurface + 'static) -> Self {
        self.ui = Some(Box::new(ui));
        self
    }

    pub fn animator(mut self, animator: impl AnimationPlayer + 'static) -> Self {
        self.animator = Some(Box::new(animator));
        self
    }

    pub fn dispatcher(mut self, dispatcher: CommandDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    pub fn free_play(mut self, enabled: bool) -> Self {
        self.free_play = enabled;
        self
    }

    pub fn journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn build(self) -> TrainerResult<Sequencer> {
        let ui = self.ui.ok_or_else(|| missing("ui surface"))?;
        let animator = self.animator.ok_or_else(|| missing("animation player"))?;
        let script = self.script.ok_or_else(|| missing("training script"))?;
        script.validate()?;
        self.timings.validate()?;

        Ok(Sequencer {
            script,
            dispatcher: self.dispatcher.unwrap_or_default(),
            timings: self.timings,
            free_play: self.free_play,
            ui,
            animator,
            journal: self.journal,
            scheduler: Scheduler::new(),
            state: SequencerState::default(),
        })
    }
}

fn missing(what: &'static str) -> TrainerError {
    error!("❌ Cannot start training: no {} configured", what);
    TrainerError::MissingCollaborator(what)
}

/// Step-by-step training state machine
pub struct Sequencer {
    script: TrainingScript,
    dispatcher: CommandDispatcher,
    timings: Timings,
    free_play: bool,
    ui: Box<dyn UiSurface>,
    animator: Box<dyn AnimationPlayer>,
    journal: Option<Journal>,
    scheduler: Scheduler<TimerEvent>,
    state: SequencerState,
}

impl Sequencer {
    pub fn builder() -> SequencerBuilder {
        SequencerBuilder::new()
    }

    /// Initialize the UI and begin level 1 after the warm-up delay
    pub fn start(&mut self) {
        if self.state.phase != Phase::Idle || self.state.flow_timer.is_some() {
            self.reset();
        }

        info!(
            "🐶 Training '{}' starting ({} levels)",
            self.script.name,
            self.script.level_count()
        );
        self.clear_surface();
        self.ui
            .set_text(TextField::Level, &level_label(self.state.level));

        let handle = self
            .scheduler
            .schedule(self.timings.warmup(), TimerEvent::StartLevel(1));
        self.state.flow_timer = Some(handle);
    }

    /// Run every timer due within `elapsed`, in deadline order
    pub fn advance_time(&mut self, elapsed: Duration) {
        let target = self.scheduler.now() + elapsed;
        while let Some(event) = self.scheduler.next_due(target) {
            self.handle_timer(event);
        }
        self.scheduler.advance_to(target);
    }

    /// Handle a final speech result
    pub fn on_voice_text(&mut self, text: &str) -> VoiceOutcome {
        match self.dispatcher.dispatch(text) {
            Some(command) => self.on_voice_command(command),
            None => VoiceOutcome::Unrecognized,
        }
    }

    /// Handle a resolved voice command
    pub fn on_voice_command(&mut self, command: DogCommand) -> VoiceOutcome {
        match self.state.phase {
            Phase::AwaitingVoice {
                command: expected,
                understood,
            } if expected == command => {
                if understood {
                    self.execute_command(command);
                } else {
                    info!("🤔 The dog does not understand '{}' yet", command);
                    self.show_model(RewardModel::Question, self.timings.confusion());
                    self.show_feedback(CONFUSION_FEEDBACK);
                }
                self.advance_step();
                VoiceOutcome::StepSatisfied(command)
            }
            Phase::AwaitingVoice { command: expected, .. } => {
                debug!("Ignoring '{}' while waiting for '{}'", command, expected);
                VoiceOutcome::Ignored(command)
            }
            _ if self.free_play => {
                if self.free_play_command(command) {
                    VoiceOutcome::FreePlay(command)
                } else {
                    VoiceOutcome::Ignored(command)
                }
            }
            phase => {
                debug!("Ignoring '{}' ({})", command, phase);
                VoiceOutcome::Ignored(command)
            }
        }
    }

    /// Handle a reward button click. Returns true if the current step wanted it.
    pub fn on_button_clicked(&mut self, button: ButtonId) -> bool {
        if self.state.phase != Phase::AwaitingButton(button) {
            debug!("Ignoring click on '{}' ({})", button, self.state.phase);
            return false;
        }

        self.ui.set_button_visible(button, false);
        let reward = match self
            .script
            .step(self.state.level, self.state.step)
            .map(|s| &s.kind)
        {
            Some(StepKind::Button { reward, .. }) => reward.clone(),
            _ => None,
        };
        if let Some(reward) = reward {
            self.show_reward(&reward);
        }

        self.advance_step();
        true
    }

    /// Tear everything down, as when the user backs out to the menu
    pub fn reset(&mut self) {
        info!("🏠 Training reset");
        self.scheduler.clear();
        self.state = SequencerState::default();
        self.clear_surface();
        self.animator.reset_to_idle();
    }

    pub fn snapshot(&self) -> SequencerSnapshot {
        SequencerSnapshot {
            script: self.script.name.clone(),
            level: self.state.level,
            step: self.state.step,
            phase: self.state.phase,
            instruction: self.state.instruction.clone(),
            animation_in_flight: self.state.animation_in_flight,
            pose: self.state.pose,
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn level(&self) -> usize {
        self.state.level
    }

    pub fn step(&self) -> usize {
        self.state.step
    }

    /// Command the current step waits for, if any
    pub fn awaiting_voice(&self) -> Option<DogCommand> {
        match self.state.phase {
            Phase::AwaitingVoice { command, .. } => Some(command),
            _ => None,
        }
    }

    pub fn awaiting_button(&self, button: ButtonId) -> bool {
        self.state.phase == Phase::AwaitingButton(button)
    }

    pub fn is_animation_in_flight(&self) -> bool {
        self.state.animation_in_flight
    }

    pub fn script(&self) -> &TrainingScript {
        &self.script
    }

    pub fn dispatcher(&self) -> &CommandDispatcher {
        &self.dispatcher
    }

    /// Virtual time since the sequencer was created
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    fn handle_timer(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::StartLevel(level) => {
                self.state.flow_timer = None;
                self.start_level(level);
            }
            TimerEvent::LevelComplete => {
                self.state.flow_timer = None;
                self.complete_level();
            }
            TimerEvent::Restart => {
                self.state.flow_timer = None;
                self.record(&format!("{}: training restarted", self.script.name));
                self.start_level(1);
            }
            TimerEvent::AnimationSettled => {
                self.state.animation_in_flight = false;
                debug!("Animation settled");
            }
            TimerEvent::HideFeedback => {
                self.state.feedback_timer = None;
                self.ui.set_text(TextField::Feedback, "");
            }
            TimerEvent::TypeInstruction => {
                self.state.instruction_timer = None;
                self.reveal_next_char();
            }
            TimerEvent::InstructionHeld => {
                // Text stays up until the next instruction replaces it
                self.state.instruction_timer = None;
            }
            TimerEvent::HideModel(model) => {
                self.state.model_timers.remove(&model);
                self.ui.set_model_visible(model, false);
            }
        }
    }

    fn start_level(&mut self, level: usize) {
        info!("📈 Level {} of '{}'", level, self.script.name);
        self.state.level = level;
        self.state.step = 0;
        self.ui.set_text(TextField::Level, &level_label(level));
        self.reset_animation();
        self.advance_step();
    }

    fn advance_step(&mut self) {
        self.state.step += 1;
        let Some(step) = self
            .script
            .step(self.state.level, self.state.step)
            .cloned()
        else {
            warn!(
                "⚠️ Level {} has no step {}",
                self.state.level, self.state.step
            );
            return;
        };

        debug!("Level {} step {}", self.state.level, self.state.step);
        self.show_instruction(&step.instruction);

        match step.kind {
            StepKind::Voice {
                command,
                understood,
            } => {
                self.state.phase = Phase::AwaitingVoice {
                    command,
                    understood,
                };
            }
            StepKind::Button { button, .. } => {
                self.ui.set_button_visible(button, true);
                self.state.phase = Phase::AwaitingButton(button);
            }
            StepKind::Finale { reward } => {
                if let Some(reward) = reward {
                    self.show_reward(&reward);
                }
                self.state.phase = Phase::ShowingReward;
                let handle = self
                    .scheduler
                    .schedule(self.timings.level_advance_delay(), TimerEvent::LevelComplete);
                self.state.flow_timer = Some(handle);
            }
        }
    }

    fn complete_level(&mut self) {
        let finished = self.state.level;
        self.record(&format!("{}: level {} completed", self.script.name, finished));

        if finished >= self.script.level_count() {
            info!("🏆 Training '{}' complete", self.script.name);
            self.state.phase = Phase::Finished;
            self.show_instruction(RESTART_MESSAGE);
            let handle = self
                .scheduler
                .schedule(self.timings.restart_delay(), TimerEvent::Restart);
            self.state.flow_timer = Some(handle);
            return;
        }

        self.state.phase = Phase::AdvancingLevel;
        self.show_instruction(ADVANCING_MESSAGE);
        self.state.level = finished + 1;
        self.state.step = 0;
        self.ui
            .set_text(TextField::Level, &level_label(self.state.level));
        self.reset_animation();

        let handle = self.scheduler.schedule(
            self.timings.level_transition_delay(),
            TimerEvent::StartLevel(self.state.level),
        );
        self.state.flow_timer = Some(handle);
    }

    /// Fire the animation unless a previous one is still settling
    fn execute_command(&mut self, command: DogCommand) -> bool {
        if self.state.animation_in_flight {
            debug!("Animation for '{}' suppressed, previous one settling", command);
            return false;
        }

        info!("▶️ Executing command: {}", command);
        self.animator.trigger(command);
        self.state.pose = DogPose::Sitting;
        self.show_feedback(command.feedback());

        self.state.animation_in_flight = true;
        self.scheduler
            .schedule(self.timings.animation_settle(), TimerEvent::AnimationSettled);
        true
    }

    fn free_play_command(&mut self, command: DogCommand) -> bool {
        if self.state.animation_in_flight {
            debug!("Free play '{}' dropped, animation settling", command);
            return false;
        }
        if command == DogCommand::Paw && self.state.pose != DogPose::Sitting {
            self.show_feedback(SIT_FIRST_FEEDBACK);
            return false;
        }
        self.execute_command(command)
    }

    fn reset_animation(&mut self) {
        self.animator.reset_to_idle();
        self.state.pose = DogPose::Standing;
    }

    fn show_reward(&mut self, reward: &Reward) {
        self.show_model(reward.model, reward.duration());
        if let Some(text) = &reward.feedback {
            self.show_feedback(text);
        }
    }

    fn show_model(&mut self, model: RewardModel, duration: Duration) {
        if let Some(previous) = self.state.model_timers.remove(&model) {
            self.scheduler.cancel(previous);
        }
        self.ui.set_model_visible(model, true);
        let handle = self.scheduler.schedule(duration, TimerEvent::HideModel(model));
        self.state.model_timers.insert(model, handle);
    }

    fn show_feedback(&mut self, text: &str) {
        if let Some(previous) = self.state.feedback_timer.take() {
            self.scheduler.cancel(previous);
        }
        self.ui.set_text(TextField::Feedback, text);
        let handle = self
            .scheduler
            .schedule(self.timings.feedback(), TimerEvent::HideFeedback);
        self.state.feedback_timer = Some(handle);
    }

    fn show_instruction(&mut self, text: &str) {
        if let Some(previous) = self.state.instruction_timer.take() {
            self.scheduler.cancel(previous);
        }
        self.state.instruction = text.to_string();

        if self.timings.typing_interval().is_zero() || text.is_empty() {
            self.state.revealed = text.chars().count();
            self.ui.set_text(TextField::Instruction, text);
            self.finish_instruction();
        } else {
            self.state.revealed = 0;
            self.reveal_next_char();
        }
    }

    fn reveal_next_char(&mut self) {
        let total = self.state.instruction.chars().count();
        self.state.revealed = (self.state.revealed + 1).min(total);
        let shown: String = self
            .state
            .instruction
            .chars()
            .take(self.state.revealed)
            .collect();
        self.ui.set_text(TextField::Instruction, &shown);

        if self.state.revealed >= total {
            self.finish_instruction();
        } else {
            let handle = self
                .scheduler
                .schedule(self.timings.typing_interval(), TimerEvent::TypeInstruction);
            self.state.instruction_timer = Some(handle);
        }
    }

    fn finish_instruction(&mut self) {
        let text = self.state.instruction.clone();
        self.ui.instruction_revealed(&text);
        let handle = self
            .scheduler
            .schedule(self.timings.instruction_hold(), TimerEvent::InstructionHeld);
        self.state.instruction_timer = Some(handle);
    }

    fn clear_surface(&mut self) {
        self.ui.set_text(TextField::Feedback, "");
        self.ui.set_text(TextField::Instruction, "");
        for model in RewardModel::ALL {
            self.ui.set_model_visible(model, false);
        }
        for button in ButtonId::ALL {
            self.ui.set_button_visible(button, false);
        }
    }

    fn record(&self, entry: &str) {
        if let Some(journal) = &self.journal {
            if let Err(e) = journal.log(entry) {
                warn!("⚠️ Could not write progress journal: {}", e);
            }
        }
    }
}

fn level_label(level: usize) -> String {
    format!("Nivel: {}", level)
}
