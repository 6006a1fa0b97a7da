//! # Orchestration
//!
//! The step completion orchestrator and the review lifecycle operations built
//! on it: creation, assignment and cancellation.
//!
//! ## Core Components
//!
//! - **StepCompletionOrchestrator**: maps steps to actions, enforces field
//!   access, applies updates and runs post-transition effects
//! - **ReviewServices**: the collaborator handles the orchestrator works through

pub mod lifecycle;
pub mod step_completion;

use crate::services::{
    ActionConfigLookup, AdminCheck, AssignmentLookup, ReviewStore, StatusChangeNotifier,
};
use std::sync::Arc;

pub use lifecycle::{AssignmentRequest, NewReview};
pub use step_completion::{action_for_step, StepCompletionOrchestrator, StepOutcome};

/// Collaborators shared by orchestration operations
#[derive(Clone)]
pub struct ReviewServices {
    pub store: Arc<dyn ReviewStore>,
    pub assignments: Arc<dyn AssignmentLookup>,
    pub admins: Arc<dyn AdminCheck>,
    pub action_configs: Arc<dyn ActionConfigLookup>,
    pub notifier: Arc<dyn StatusChangeNotifier>,
}
