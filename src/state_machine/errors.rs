use crate::services::ServiceError;
use thiserror::Error;

/// Errors raised by callers that require a transition to happen.
///
/// Plain evaluation never errors: a guard failure or unmatched rule is `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("Review is in terminal state '{state}' and cannot transition")]
    TerminalState { state: String },

    #[error("No transition from '{from}' on action '{action}'")]
    NoTransition { from: String, action: String },
}

/// Errors raised while running post-transition side effects
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActionError {
    #[error("Side effect '{action}' failed for review {review_id}: {reason}")]
    SideEffectFailed {
        action: &'static str,
        review_id: i64,
        reason: String,
    },

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
}

/// Result type alias for state machine operations
pub type StateMachineResult<T> = Result<T, StateMachineError>;
pub type ActionResult<T> = Result<T, ActionError>;

/// Helper function to create side-effect failures
pub fn side_effect_failed(
    action: &'static str,
    review_id: i64,
    reason: impl Into<String>,
) -> ActionError {
    ActionError::SideEffectFailed {
        action,
        review_id,
        reason: reason.into(),
    }
}
