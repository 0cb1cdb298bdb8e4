//! Actuation errors

use gestura_core::GesturaError;
use thiserror::Error;

/// Failure reported by an actuator call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActuationError {
    #[error("{action} rejected: {reason}")]
    Rejected { action: String, reason: String },

    #[error("Actuator unavailable: {0}")]
    Unavailable(String),
}

impl ActuationError {
    pub fn rejected(action: impl Into<String>, reason: impl Into<String>) -> Self {
        ActuationError::Rejected {
            action: action.into(),
            reason: reason.into(),
        }
    }
}

impl From<ActuationError> for GesturaError {
    fn from(err: ActuationError) -> Self {
        GesturaError::Actuation(err.to_string())
    }
}

/// Result type for actuator calls
pub type ActuationResult<T> = Result<T, ActuationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_gestura_error() {
        let err: GesturaError = ActuationError::rejected("press_key(w)", "device busy").into();
        assert_eq!(
            err,
            GesturaError::Actuation("press_key(w) rejected: device busy".into())
        );
    }
}
