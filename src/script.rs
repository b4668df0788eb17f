//! Training scripts
//!
//! A script is a table of levels, each an ordered list of steps. The built-in
//! `sit` and `paw` scripts are the three-level tutorials of the app; custom
//! scripts can be loaded from JSON.

use crate::commands::DogCommand;
use crate::config::is_duration_seconds;
use crate::error::{TrainerError, TrainerResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

const SAY_SIT: &str = "Di el comando: \"Siéntate\" o \"Sentado\"";
const SAY_SIT_FIRST: &str = "Primero di: \"Siéntate\" o \"Sentado\"";
const SAY_PAW: &str = "Ahora di: \"Pata\" o \"Dame la pata\"";
const SHOW_COOKIE: &str = "Muestra galleta, dándole clic";
const GIVE_COOKIE: &str = "Da la galleta, dando clic";
const PET_DOG: &str = "Acaricia a tu perrito, dando clic en la mano";
const PET_DOG_KNOWS: &str =
    "¡Muy bien! Tu perro ya sabe el comando. Acaricia a tu perrito, dando clic en la mano";
const PLAY_BALL: &str = "Tu perrito merece una mayor recompensa, ¡juega con él! Da clic en la pelota";
const TRAINING_DONE: &str = "¡Finalizamos el entrenamiento, suerte con tu peludo!";

/// On-screen reward buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonId {
    #[serde(alias = "galleta")]
    Cookie,
    #[serde(alias = "acariciar")]
    Pet,
    #[serde(alias = "pelota")]
    Ball,
}

impl ButtonId {
    pub const ALL: [ButtonId; 3] = [ButtonId::Cookie, ButtonId::Pet, ButtonId::Ball];

    pub fn label(&self) -> &'static str {
        match self {
            ButtonId::Cookie => "galleta",
            ButtonId::Pet => "acariciar",
            ButtonId::Ball => "pelota",
        }
    }
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ButtonId {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "galleta" | "cookie" => Ok(ButtonId::Cookie),
            "acariciar" | "mano" | "pet" => Ok(ButtonId::Pet),
            "pelota" | "ball" => Ok(ButtonId::Ball),
            other => Err(TrainerError::Script(format!("unknown button '{}'", other))),
        }
    }
}

/// Transient 3D feedback models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardModel {
    /// "¿?" marker, the dog did not understand yet
    Question,
    Exclamation,
    Heart,
}

impl RewardModel {
    pub const ALL: [RewardModel; 3] = [
        RewardModel::Question,
        RewardModel::Exclamation,
        RewardModel::Heart,
    ];
}

/// A reward model shown for a while, optionally with feedback text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub model: RewardModel,
    #[serde(default)]
    pub feedback: Option<String>,
    pub seconds: f64,
}

impl Reward {
    pub fn new(model: RewardModel, feedback: Option<&str>, seconds: f64) -> Self {
        Self {
            model,
            feedback: feedback.map(str::to_string),
            seconds,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.seconds)
    }

    fn exclamation() -> Self {
        Self::new(RewardModel::Exclamation, Some("¡!"), 2.0)
    }

    fn heart() -> Self {
        Self::new(RewardModel::Heart, Some("♥"), 2.0)
    }
}

/// What a step waits for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepKind {
    /// Wait for a voice command. `understood` only changes the feedback.
    Voice { command: DogCommand, understood: bool },
    /// Wait for a button click, then show the reward
    Button {
        button: ButtonId,
        #[serde(default)]
        reward: Option<Reward>,
    },
    /// Closing message of a level
    Finale {
        #[serde(default)]
        reward: Option<Reward>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub instruction: String,
    #[serde(flatten)]
    pub kind: StepKind,
}

impl Step {
    pub fn voice(instruction: &str, command: DogCommand, understood: bool) -> Self {
        Self {
            instruction: instruction.to_string(),
            kind: StepKind::Voice {
                command,
                understood,
            },
        }
    }

    pub fn button(instruction: &str, button: ButtonId, reward: Option<Reward>) -> Self {
        Self {
            instruction: instruction.to_string(),
            kind: StepKind::Button { button, reward },
        }
    }

    pub fn finale(instruction: &str, reward: Option<Reward>) -> Self {
        Self {
            instruction: instruction.to_string(),
            kind: StepKind::Finale { reward },
        }
    }

    pub fn is_finale(&self) -> bool {
        matches!(self.kind, StepKind::Finale { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingLevel {
    pub steps: Vec<Step>,
}

impl TrainingLevel {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingScript {
    pub name: String,
    pub levels: Vec<TrainingLevel>,
}

impl TrainingScript {
    /// Teach "sentado"
    pub fn sit() -> Self {
        use DogCommand::Sit;

        Self {
            name: "sit".to_string(),
            levels: vec![
                TrainingLevel::new(vec![
                    Step::voice(SAY_SIT, Sit, false),
                    Step::button(SHOW_COOKIE, ButtonId::Cookie, Some(Reward::exclamation())),
                    Step::voice("Di nuevamente el comando: \"Siéntate\" o \"Sentado\"", Sit, true),
                    Step::button(GIVE_COOKIE, ButtonId::Cookie, None),
                    Step::finale(
                        "¡Lograste aprender este comando!",
                        Some(Reward::new(RewardModel::Heart, None, 3.0)),
                    ),
                ]),
                TrainingLevel::new(vec![
                    Step::button(SHOW_COOKIE, ButtonId::Cookie, Some(Reward::exclamation())),
                    Step::voice(SAY_SIT, Sit, true),
                    Step::button(PET_DOG, ButtonId::Pet, Some(Reward::heart())),
                    Step::finale(
                        "Muy bien, tu perrito ya no necesita más premios para hacer el comando.",
                        None,
                    ),
                ]),
                TrainingLevel::new(vec![
                    Step::voice(SAY_SIT, Sit, true),
                    Step::button(PET_DOG_KNOWS, ButtonId::Pet, Some(Reward::heart())),
                    Step::button(PLAY_BALL, ButtonId::Ball, Some(Reward::heart())),
                    Step::finale(TRAINING_DONE, None),
                ]),
            ],
        }
    }

    /// Teach "pata"; every level asks the dog to sit first
    pub fn paw() -> Self {
        use DogCommand::{Paw, Sit};

        Self {
            name: "paw".to_string(),
            levels: vec![
                TrainingLevel::new(vec![
                    Step::voice(SAY_SIT_FIRST, Sit, true),
                    Step::voice(SAY_PAW, Paw, false),
                    Step::button(SHOW_COOKIE, ButtonId::Cookie, Some(Reward::exclamation())),
                    Step::voice("Di nuevamente: \"Siéntate\" o \"Sentado\"", Sit, true),
                    Step::voice("Di otra vez: \"Pata\" o \"Dame la pata\"", Paw, true),
                    Step::button(GIVE_COOKIE, ButtonId::Cookie, None),
                    Step::finale(
                        "¡Lograste enseñar el comando Pata!",
                        Some(Reward::new(RewardModel::Heart, None, 3.0)),
                    ),
                ]),
                TrainingLevel::new(vec![
                    Step::voice(SAY_SIT_FIRST, Sit, true),
                    Step::button(SHOW_COOKIE, ButtonId::Cookie, Some(Reward::exclamation())),
                    Step::voice("Di: \"Pata\" o \"Dame la pata\"", Paw, true),
                    Step::button(PET_DOG, ButtonId::Pet, Some(Reward::heart())),
                    Step::finale(
                        "Muy bien, tu perrito ya casi no necesita premios para dar la pata.",
                        None,
                    ),
                ]),
                TrainingLevel::new(vec![
                    Step::voice(SAY_SIT_FIRST, Sit, true),
                    Step::voice(SAY_PAW, Paw, true),
                    Step::button(PET_DOG_KNOWS, ButtonId::Pet, Some(Reward::heart())),
                    Step::button(PLAY_BALL, ButtonId::Ball, Some(Reward::heart())),
                    Step::finale(TRAINING_DONE, None),
                ]),
            ],
        }
    }

    /// Look up a built-in script by trick name
    pub fn builtin(name: &str) -> TrainerResult<Self> {
        match name.trim().to_lowercase().as_str() {
            "sit" | "sentado" => Ok(Self::sit()),
            "paw" | "pata" => Ok(Self::paw()),
            other => Err(TrainerError::Script(format!("unknown trick '{}'", other))),
        }
    }

    /// Load and validate a script from a JSON file
    pub fn load(path: &Path) -> TrainerResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let script: TrainingScript = serde_json::from_str(&content)?;
        script.validate()?;
        Ok(script)
    }

    /// Every level must be non-empty and end with its only Finale
    pub fn validate(&self) -> TrainerResult<()> {
        if self.levels.is_empty() {
            return Err(TrainerError::Script(format!(
                "script '{}' has no levels",
                self.name
            )));
        }

        for (idx, level) in self.levels.iter().enumerate() {
            let ordinal = idx + 1;
            let Some(last) = level.steps.last() else {
                return Err(TrainerError::Script(format!(
                    "level {} has no steps",
                    ordinal
                )));
            };
            if !last.is_finale() {
                return Err(TrainerError::Script(format!(
                    "level {} does not end with a finale step",
                    ordinal
                )));
            }
            if let Some(pos) = level.steps[..level.steps.len() - 1]
                .iter()
                .position(Step::is_finale)
            {
                return Err(TrainerError::Script(format!(
                    "level {} has a finale at step {} before its last step",
                    ordinal,
                    pos + 1
                )));
            }
            for step in &level.steps {
                let reward = match &step.kind {
                    StepKind::Button { reward, .. } | StepKind::Finale { reward } => reward.as_ref(),
                    StepKind::Voice { .. } => None,
                };
                if let Some(reward) = reward {
                    if !is_duration_seconds(reward.seconds) {
                        return Err(TrainerError::Script(format!(
                            "level {} has a reward with invalid duration {}",
                            ordinal, reward.seconds
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Level by 1-based ordinal
    pub fn level(&self, ordinal: usize) -> Option<&TrainingLevel> {
        ordinal.checked_sub(1).and_then(|idx| self.levels.get(idx))
    }

    /// Step by 1-based level ordinal and 1-based step index
    pub fn step(&self, level: usize, step: usize) -> Option<&Step> {
        self.level(level)
            .and_then(|l| step.checked_sub(1).and_then(|idx| l.steps.get(idx)))
    }
}
