//! # Review State Machine
//!
//! State registry, transition table and evaluator for material disposition
//! reviews, plus the post-transition actions run once a status change has
//! been committed.

pub mod actions;
pub mod context;
pub mod errors;
pub mod events;
pub mod guards;
pub mod review_state_machine;
pub mod sme_policy;
pub mod states;
pub mod transitions;

// Re-export main types for convenience
pub use actions::{
    execute_actions, CloseAssignmentsAction, PublishStatusChangeAction, StateAction,
    SupersedePreviousApprovalsAction,
};
pub use context::{StatusTransition, TransitionContext};
pub use errors::{ActionError, ActionResult, StateMachineError, StateMachineResult};
pub use events::ReviewAction;
pub use review_state_machine::{ReviewStateMachine, WorkflowPosition};
pub use sme_policy::{is_sme_required, ActionConfig, SmeFallback, SmeRequirementPolicy};
pub use states::{ReviewState, StateMetadata, StepName};
pub use transitions::{SourceState, TransitionRule, TransitionTarget, TRANSITIONS};
