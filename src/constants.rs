//! # Workflow Constants
//!
//! Sentinel values, payload keys and event names shared across the crate.

use crate::state_machine::ReviewState;

/// `final_decision` value that rejects a review; every other value approves
pub const REJECT_DECISION: &str = "reject";

/// Transition payload key carrying the proposed action's lookup configuration
pub const PROPOSED_ACTION_CONFIG_KEY: &str = "proposed_action_config";

/// Default lookup-option category for proposed-action configuration
pub const DEFAULT_ACTION_CONFIG_CATEGORY: &str = "proposed_action";

/// Reason recorded when the assignment step moves an assignment to a new user
pub const REASSIGNED_DURING_ASSIGNMENT: &str = "Reassigned during assignment step";

/// Published event names
pub mod events {
    pub const REVIEW_STATUS_CHANGED: &str = "review.status_changed";
    pub const REVIEW_ASSIGNED: &str = "review.assigned";
}

/// Status groupings used by callers and tests
pub mod status_groups {
    use super::ReviewState;

    pub const TERMINAL_STATES: [ReviewState; 3] = [
        ReviewState::Approved,
        ReviewState::Rejected,
        ReviewState::Cancelled,
    ];

    pub const ACTIVE_STATES: [ReviewState; 4] = [
        ReviewState::Draft,
        ReviewState::PendingAssignment,
        ReviewState::PendingSme,
        ReviewState::PendingDecision,
    ];
}
