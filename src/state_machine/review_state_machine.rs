use super::context::TransitionContext;
use super::errors::{StateMachineError, StateMachineResult};
use super::events::ReviewAction;
use super::sme_policy::{ActionConfig, SmeRequirementPolicy};
use super::states::{self, ReviewState, StateMetadata, StepName};
use super::transitions;
use crate::config::WorkflowSettings;
use crate::models::{FieldUpdates, Review};
use serde::Serialize;
use tracing::{debug, trace};

/// Where a review currently sits in the workflow, as shown to a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowPosition {
    pub status: String,
    pub step: StepName,
    pub is_terminal: bool,
    pub sme_required: bool,
    pub valid_actions: Vec<ReviewAction>,
}

/// Review workflow state machine.
///
/// Evaluation is pure: [`ReviewStateMachine::next_status`] never mutates the
/// review and never fails. `None` means "leave the status unchanged".
#[derive(Debug, Clone, Default)]
pub struct ReviewStateMachine {
    sme_policy: SmeRequirementPolicy,
}

impl ReviewStateMachine {
    pub fn new(sme_policy: SmeRequirementPolicy) -> Self {
        Self { sme_policy }
    }

    pub fn from_settings(settings: &WorkflowSettings) -> Self {
        Self::new(SmeRequirementPolicy::new(settings.sme_fallback.clone()))
    }

    pub fn sme_policy(&self) -> &SmeRequirementPolicy {
        &self.sme_policy
    }

    pub fn is_sme_required(&self, proposed_action: Option<&str>, config: Option<&ActionConfig>) -> bool {
        self.sme_policy.is_sme_required(proposed_action, config)
    }

    /// Evaluate `action` against the transition table.
    ///
    /// Terminal statuses never transition. The first rule matching the current
    /// status and action decides; when its guard fails there is no transition.
    pub fn next_status(
        &self,
        current_status: &str,
        action: ReviewAction,
        review: &Review,
        data: &FieldUpdates,
    ) -> Option<ReviewState> {
        if states::is_terminal(current_status) {
            trace!(status = current_status, action = %action, "Terminal status, no transition");
            return None;
        }

        let current = current_status.parse::<ReviewState>().ok();
        let rule = transitions::find_rule(current, action)?;
        let ctx = TransitionContext::new(review, data, &self.sme_policy);

        if let Some(guard) = &rule.guard {
            if !guard.check(&ctx) {
                debug!(
                    status = current_status,
                    action = %action,
                    guard = guard.description(),
                    "Transition guard not satisfied"
                );
                return None;
            }
        }

        Some(rule.to.resolve(&ctx))
    }

    /// Like [`Self::next_status`], for callers that need the transition to happen
    pub fn require_transition(
        &self,
        current_status: &str,
        action: ReviewAction,
        review: &Review,
        data: &FieldUpdates,
    ) -> StateMachineResult<ReviewState> {
        if states::is_terminal(current_status) {
            return Err(StateMachineError::TerminalState {
                state: current_status.to_string(),
            });
        }
        self.next_status(current_status, action, review, data)
            .ok_or_else(|| StateMachineError::NoTransition {
                from: current_status.to_string(),
                action: action.to_string(),
            })
    }

    pub fn can_transition(
        &self,
        current_status: &str,
        action: ReviewAction,
        review: &Review,
        data: &FieldUpdates,
    ) -> bool {
        self.next_status(current_status, action, review, data).is_some()
    }

    /// Actions with a rule leaving `status`, before guards are considered
    pub fn valid_actions(status: &str) -> Vec<ReviewAction> {
        if states::is_terminal(status) {
            return Vec::new();
        }
        transitions::actions_from(status.parse().ok())
    }

    pub fn is_terminal(status: &str) -> bool {
        states::is_terminal(status)
    }

    /// Editable means not terminal
    pub fn can_edit(status: &str) -> bool {
        !states::is_terminal(status)
    }

    pub fn step_for_status(status: &str) -> StepName {
        states::step_for(status)
    }

    pub fn state_metadata(status: &str) -> Option<StateMetadata> {
        states::metadata(status)
    }

    /// Current form step and SME requirement for a review.
    ///
    /// Drafts are split into sub-steps by progress: general info until a
    /// reason is recorded, then the checklist.
    pub fn workflow_position(&self, review: &Review, config: Option<&ActionConfig>) -> WorkflowPosition {
        let step = match review.state() {
            Some(ReviewState::Draft) if review.completed_checklist => StepName::Assignment,
            Some(ReviewState::Draft) if review.review_reason.is_some() => StepName::Checklist,
            _ => review.current_step(),
        };

        WorkflowPosition {
            status: review.status.clone(),
            step,
            is_terminal: review.is_terminal(),
            sme_required: self.is_sme_required(review.proposed_action.as_deref(), config),
            valid_actions: Self::valid_actions(&review.status),
        }
    }
}
