use super::context::StatusTransition;
use super::errors::{side_effect_failed, ActionResult};
use super::states::ReviewState;
use crate::logging::log_review_transition;
use crate::models::{AssignmentStatus, Review};
use crate::services::{ReviewStore, StatusChangeNotifier};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Trait for implementing state transition actions
#[async_trait]
pub trait StateAction: Send + Sync {
    /// Execute the action
    async fn execute(&self, review: &Review, transition: &StatusTransition) -> ActionResult<()>;

    /// Get a description of this action for logging
    fn description(&self) -> &'static str;
}

/// Notify involved users of the status change.
///
/// Delivery problems are logged and swallowed: a missed notification never
/// undoes or fails a committed transition.
pub struct PublishStatusChangeAction {
    notifier: Arc<dyn StatusChangeNotifier>,
}

impl PublishStatusChangeAction {
    pub fn new(notifier: Arc<dyn StatusChangeNotifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl StateAction for PublishStatusChangeAction {
    async fn execute(&self, review: &Review, transition: &StatusTransition) -> ActionResult<()> {
        if let Err(e) = self
            .notifier
            .notify_status_change(review, &transition.from_status, transition.to_state, transition.changed_by)
            .await
        {
            warn!(
                review_id = review.review_id,
                from = %transition.from_status,
                to = %transition.to_state,
                error = %e,
                "Status change notification failed"
            );
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Notify involved users of the status change"
    }
}

/// On approval, mark earlier approved reviews of the same material superseded
pub struct SupersedePreviousApprovalsAction {
    store: Arc<dyn ReviewStore>,
}

impl SupersedePreviousApprovalsAction {
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StateAction for SupersedePreviousApprovalsAction {
    async fn execute(&self, review: &Review, transition: &StatusTransition) -> ActionResult<()> {
        if transition.to_state != ReviewState::Approved {
            return Ok(());
        }

        let superseded = self
            .store
            .supersede_previous_approvals(review.material_number, review.review_id)
            .await
            .map_err(|e| side_effect_failed(self.description(), review.review_id, e.to_string()))?;

        if !superseded.is_empty() {
            info!(
                review_id = review.review_id,
                material_number = review.material_number,
                superseded = ?superseded,
                "Superseded previous approved reviews"
            );
        }
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Supersede previous approvals"
    }
}

/// On a terminal status, close the review's open assignments
pub struct CloseAssignmentsAction {
    store: Arc<dyn ReviewStore>,
}

impl CloseAssignmentsAction {
    pub fn new(store: Arc<dyn ReviewStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl StateAction for CloseAssignmentsAction {
    async fn execute(&self, review: &Review, transition: &StatusTransition) -> ActionResult<()> {
        if !transition.is_terminal() {
            return Ok(());
        }

        let closing_status = if transition.to_state == ReviewState::Cancelled {
            AssignmentStatus::Cancelled
        } else {
            AssignmentStatus::Completed
        };

        let closed = self
            .store
            .close_open_assignments(review.review_id, closing_status)
            .await
            .map_err(|e| side_effect_failed(self.description(), review.review_id, e.to_string()))?;

        debug!(
            review_id = review.review_id,
            closed,
            status = %closing_status,
            "Closed open assignments"
        );
        Ok(())
    }

    fn description(&self) -> &'static str {
        "Close open assignments"
    }
}

/// Run every action for a transition.
///
/// All actions are attempted even when an earlier one fails; the first
/// failure is returned so the caller can retry the failed effects.
pub async fn execute_actions(
    actions: &[Box<dyn StateAction>],
    review: &Review,
    transition: &StatusTransition,
) -> ActionResult<()> {
    log_review_transition(
        transition.review_id,
        &transition.from_status,
        transition.to_state.as_str(),
        transition.action.action_type(),
        transition.changed_by,
    );

    let mut first_failure = None;
    for action in actions {
        debug!(
            review_id = review.review_id,
            action = action.description(),
            "Executing transition action"
        );
        if let Err(e) = action.execute(review, transition).await {
            warn!(
                review_id = review.review_id,
                action = action.description(),
                error = %e,
                "Transition action failed"
            );
            first_failure.get_or_insert(e);
        }
    }

    match first_failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
