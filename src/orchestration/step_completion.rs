//! # Step Completion
//!
//! Maps a submitted form step to a workflow action, writes the step's fields
//! and re-derives the review status.
//!
//! Completion runs in two stages so the caller can commit in between:
//!
//! 1. [`StepCompletionOrchestrator::complete_step`] validates, mutates the
//!    in-memory review and reports the status change, if any.
//! 2. [`StepCompletionOrchestrator::apply_transition_effects`] runs the side
//!    effects of that change once the review has been persisted.
//!
//! [`StepCompletionOrchestrator::submit_step`] chains both around a save for
//! callers happy to let the orchestrator persist through [`ReviewStore`].
//!
//! The caller must serialize writes per review. Two concurrent submissions
//! against the same stored status can otherwise both pass a guard and fire
//! the same transition twice.

use super::ReviewServices;
use crate::access::{step_assignee_role, validate_assignee, FieldAccessPolicy};
use crate::config::ReviewWorkflowConfig;
use crate::constants::REJECT_DECISION;
use crate::error::Result;
use crate::models::{ChecklistSubmission, FieldUpdates, Review, ReviewChecklist};
use crate::services::ReviewStore;
use crate::state_machine::{
    execute_actions, ActionConfig, CloseAssignmentsAction, PublishStatusChangeAction,
    ReviewAction, ReviewState, ReviewStateMachine, StateAction, StatusTransition, StepName,
    SupersedePreviousApprovalsAction,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Result of completing one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub previous_status: String,
    /// Action derived from the step, whether or not it moved the status
    pub action: Option<ReviewAction>,
    /// Present only when the status actually changed
    pub transition: Option<StatusTransition>,
}

impl StepOutcome {
    fn unchanged(previous_status: impl Into<String>, action: Option<ReviewAction>) -> Self {
        Self {
            previous_status: previous_status.into(),
            action,
            transition: None,
        }
    }

    pub fn status_changed(&self) -> bool {
        self.transition.is_some()
    }

    pub fn new_state(&self) -> Option<ReviewState> {
        self.transition.as_ref().map(|t| t.to_state)
    }
}

/// Workflow action fired by submitting `step` with `data`.
///
/// `general_info` and `follow_up` are plain field writes. The SME step fires
/// only once a recommendation is supplied, so partial notes can be saved.
pub fn action_for_step(step: StepName, data: &FieldUpdates) -> Option<ReviewAction> {
    match step {
        StepName::GeneralInfo | StepName::FollowUp => None,
        StepName::Checklist => Some(ReviewAction::CompleteChecklist),
        StepName::Assignment => Some(ReviewAction::Assign),
        StepName::SmeInvestigation => {
            is_truthy(data.get("sme_recommendation")).then_some(ReviewAction::SubmitSmeReview)
        }
        StepName::FinalDecision => match data.get("final_decision") {
            Some(Value::String(decision)) if decision == REJECT_DECISION => Some(ReviewAction::Reject),
            decision if is_truthy(decision) => Some(ReviewAction::Approve),
            _ => None,
        },
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Drives step submissions, assignment, creation and cancellation of reviews
pub struct StepCompletionOrchestrator {
    machine: ReviewStateMachine,
    action_config_category: String,
    access: FieldAccessPolicy,
    services: ReviewServices,
}

impl StepCompletionOrchestrator {
    pub fn new(config: &ReviewWorkflowConfig, services: ReviewServices) -> Self {
        Self {
            machine: ReviewStateMachine::from_settings(&config.workflow),
            action_config_category: config.workflow.action_config_category.clone(),
            access: FieldAccessPolicy::new(services.assignments.clone()),
            services,
        }
    }

    pub fn state_machine(&self) -> &ReviewStateMachine {
        &self.machine
    }

    pub fn services(&self) -> &ReviewServices {
        &self.services
    }

    pub(super) fn store(&self) -> &dyn ReviewStore {
        self.services.store.as_ref()
    }

    /// Configuration for the review's proposed action, if one is registered
    pub async fn lookup_action_config(&self, review: &Review) -> Result<Option<ActionConfig>> {
        let Some(action) = review.proposed_action.as_deref().filter(|a| !a.is_empty()) else {
            return Ok(None);
        };
        Ok(self
            .services
            .action_configs
            .get_action_config(&self.action_config_category, action)
            .await?)
    }

    /// Validate and apply one step submission to `review` in memory.
    ///
    /// Nothing is written when validation fails. On success the checklist
    /// record (for the checklist step) has been stored, `review` carries the
    /// new field values and status, and the outcome describes any status
    /// change. The review itself is not persisted.
    #[instrument(skip(self, review, updates), fields(review_id = review.review_id))]
    pub async fn complete_step(
        &self,
        review: &mut Review,
        step: StepName,
        updates: FieldUpdates,
        actor: Uuid,
    ) -> Result<StepOutcome> {
        FieldAccessPolicy::validate_can_edit(review)?;
        if let Some(role) = step_assignee_role(step) {
            validate_assignee(
                review.review_id,
                actor,
                role,
                self.services.admins.as_ref(),
                self.services.assignments.as_ref(),
            )
            .await?;
        }
        self.access.authorize_update(review, actor, &updates).await?;

        let previous_status = review.status.clone();
        let mut staged = review.clone();

        let (checklist, review_updates) = if step == StepName::Checklist {
            let (submission, remaining) = ChecklistSubmission::split_from(&updates)?;
            (Some(submission), remaining)
        } else {
            (None, updates.clone())
        };

        staged.apply_updates(&review_updates)?;
        if matches!(updates.get("requires_follow_up"), Some(Value::Bool(false))) {
            staged.clear_follow_up_schedule();
        }

        if let Some(submission) = &checklist {
            let record = match self.store().find_checklist(staged.review_id).await? {
                Some(mut existing) => {
                    existing.apply(submission, actor)?;
                    existing
                }
                None => ReviewChecklist::create(staged.review_id, submission, actor)?,
            };
            self.store().save_checklist(record).await?;
            // The completion guard reads this flag
            staged.completed_checklist = true;
        }

        let action = action_for_step(step, &updates);
        let transition = match action {
            Some(action) => {
                let data = self.transition_data(action, &staged, &updates).await?;
                self.apply_action(&mut staged, action, &data, actor)
            }
            None => None,
        };

        staged.last_updated_by = Some(actor);
        staged.updated_at = Utc::now();
        *review = staged;

        debug!(
            previous_status = %previous_status,
            status = %review.status,
            action = ?action,
            changed = transition.is_some(),
            "Step completed"
        );

        Ok(StepOutcome {
            previous_status,
            action,
            transition,
        })
    }

    /// Run notification, supersession and assignment closure for a committed
    /// status change. A failure here leaves the status change in place.
    pub async fn apply_transition_effects(&self, review: &Review, transition: &StatusTransition) -> Result<()> {
        let actions: Vec<Box<dyn StateAction>> = vec![
            Box::new(PublishStatusChangeAction::new(self.services.notifier.clone())),
            Box::new(SupersedePreviousApprovalsAction::new(self.services.store.clone())),
            Box::new(CloseAssignmentsAction::new(self.services.store.clone())),
        ];
        execute_actions(&actions, review, transition).await?;
        Ok(())
    }

    /// Complete a step, persist the review, then run any transition effects
    pub async fn submit_step(
        &self,
        review: &mut Review,
        step: StepName,
        updates: FieldUpdates,
        actor: Uuid,
    ) -> Result<StepOutcome> {
        let outcome = self.complete_step(review, step, updates, actor).await?;
        self.persist_and_apply(review, &outcome).await?;
        Ok(outcome)
    }

    pub(super) async fn persist_and_apply(&self, review: &Review, outcome: &StepOutcome) -> Result<()> {
        self.store().save_review(review).await?;
        if let Some(transition) = &outcome.transition {
            info!(
                review_id = review.review_id,
                from = %transition.from_status,
                to = %transition.to_state,
                "Review status changed"
            );
            self.apply_transition_effects(review, transition).await?;
        }
        Ok(())
    }

    /// Payload handed to guards and resolvers; `assign` carries the proposed
    /// action's configuration
    pub(super) async fn transition_data(
        &self,
        action: ReviewAction,
        review: &Review,
        updates: &FieldUpdates,
    ) -> Result<FieldUpdates> {
        let mut data = updates.clone();
        if action == ReviewAction::Assign {
            if let Some(config) = self.lookup_action_config(review).await? {
                config.attach_to(&mut data);
            }
        }
        Ok(data)
    }

    /// Evaluate `action` and move `review` to the new status when it differs
    pub(super) fn apply_action(
        &self,
        review: &mut Review,
        action: ReviewAction,
        data: &FieldUpdates,
        actor: Uuid,
    ) -> Option<StatusTransition> {
        let next = self.machine.next_status(&review.status, action, review, data)?;
        if next.as_str() == review.status {
            return None;
        }

        let transition = StatusTransition::new(review, review.status.clone(), next, action, actor);
        review.status = next.to_string();
        if matches!(next, ReviewState::Approved | ReviewState::Rejected) {
            review.record_decision(actor, transition.changed_at);
        }
        Some(transition)
    }

    pub(super) fn unchanged(review: &Review, action: Option<ReviewAction>) -> StepOutcome {
        StepOutcome::unchanged(review.status.clone(), action)
    }
}
