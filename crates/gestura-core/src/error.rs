//! Error types for Gestura

use thiserror::Error;

use crate::LandmarkGroup;

/// Core Gestura errors
///
/// Missing landmarks are not errors: queries return `None` for them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GesturaError {
    // Input errors
    #[error("Invalid {group:?} group size: expected {expected}, got {actual}")]
    InvalidGroupSize {
        group: LandmarkGroup,
        expected: usize,
        actual: usize,
    },

    #[error("Unknown landmark name: {0}")]
    UnknownLandmark(String),

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Collaborator errors
    #[error("Pose engine error: {0}")]
    PoseEngine(String),

    #[error("Actuation failed: {0}")]
    Actuation(String),
}

/// Result type for Gestura operations
pub type GesturaResult<T> = Result<T, GesturaError>;
