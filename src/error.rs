use crate::access::AccessError;
use crate::config::ConfigurationError;
use crate::services::ServiceError;
use crate::state_machine::{ActionError, StateMachineError};
use thiserror::Error;

/// Top-level error for review workflow operations
#[derive(Error, Debug)]
pub enum ReviewWorkflowError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("State transition error: {0}")]
    StateMachine(#[from] StateMachineError),

    /// Post-transition side effects failed; the status change itself is already applied
    #[error("Transition side effect error: {0}")]
    Action(#[from] ActionError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl ReviewWorkflowError {
    /// Whether the caller may retry the same request later
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Action(_) | Self::Service(_))
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::Access(_))
    }
}

pub type Result<T> = std::result::Result<T, ReviewWorkflowError>;
