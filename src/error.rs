//! Trufoso Error Types
//!
//! Centralized error handling for the training core and its collaborators.

use thiserror::Error;

/// Central error type for Trufoso
#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("Missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("Training script error: {0}")]
    Script(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Microphone permission error: {0}")]
    Permission(String),

    #[error("Speech engine error: {0}")]
    Speech(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Trufoso operations
pub type TrainerResult<T> = Result<T, TrainerError>;
