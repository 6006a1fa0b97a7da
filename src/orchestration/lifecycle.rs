use super::step_completion::{StepCompletionOrchestrator, StepOutcome};
use crate::access::{AccessError, FieldAccessPolicy};
use crate::constants::REASSIGNED_DURING_ASSIGNMENT;
use crate::error::{Result, ReviewWorkflowError};
use crate::logging::log_review_operation;
use crate::models::{Assignment, AssignmentRole, FieldUpdates, Review};
use crate::state_machine::ReviewAction;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Initial values for a new draft review
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NewReview {
    pub material_number: i64,
    pub initiated_by: Uuid,
    pub review_reason: Option<String>,
    pub months_no_movement: Option<i32>,
    pub proposed_action: Option<String>,
    pub proposed_safety_stock_qty: Option<f64>,
    pub proposed_unrestricted_qty: Option<f64>,
    pub business_justification: Option<String>,
    pub previous_review_id: Option<i64>,
}

/// Users to bind to a review at the assignment step
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssignmentRequest {
    /// Needed only when the proposed action requires SME review
    pub sme_user_id: Option<Uuid>,
    pub approver_user_id: Uuid,
    pub due_at: Option<DateTime<Utc>>,
}

impl StepCompletionOrchestrator {
    /// Fail when the material already has a review that is not terminal
    pub async fn validate_no_active_review(&self, material_number: i64) -> Result<()> {
        if let Some(active) = self.store().find_active_review(material_number).await? {
            return Err(ReviewWorkflowError::Conflict(format!(
                "Material {material_number} already has an active review (id {}, status '{}')",
                active.review_id, active.status
            )));
        }
        Ok(())
    }

    /// Create and store a draft review
    pub async fn create_review(&self, request: NewReview) -> Result<Review> {
        self.validate_no_active_review(request.material_number).await?;

        let mut review = Review::new_draft(0, request.material_number, request.initiated_by);
        review.review_reason = request.review_reason;
        review.months_no_movement = request.months_no_movement;
        review.proposed_action = request.proposed_action;
        review.proposed_safety_stock_qty = request.proposed_safety_stock_qty;
        review.proposed_unrestricted_qty = request.proposed_unrestricted_qty;
        review.business_justification = request.business_justification;
        review.previous_review_id = request.previous_review_id;

        let review = self.store().insert_review(review).await?;
        log_review_operation(
            "create",
            Some(review.review_id),
            Some(review.material_number),
            &review.status,
            None,
        );
        Ok(review)
    }

    /// Bind the SME and approver, then fire `assign`.
    ///
    /// Existing active assignments for a role are moved to the new user rather
    /// than duplicated. The status only moves while the review is pending
    /// assignment; at later non-terminal statuses the assignments are updated
    /// and the status is left alone. Every newly bound user gets a
    /// `review.assigned` notification.
    pub async fn complete_assignment_step(
        &self,
        review: &mut Review,
        request: AssignmentRequest,
        actor: Uuid,
    ) -> Result<StepOutcome> {
        FieldAccessPolicy::validate_can_edit(review)?;

        let config = self.lookup_action_config(review).await?;
        let sme_required = self
            .state_machine()
            .is_sme_required(review.proposed_action.as_deref(), config.as_ref());
        if sme_required && request.sme_user_id.is_none() {
            return Err(ReviewWorkflowError::Validation(format!(
                "Proposed action '{}' requires SME review; an SME must be assigned",
                review.proposed_action.as_deref().unwrap_or_default()
            )));
        }

        let existing = self.store().list_assignments(review.review_id).await?;
        let mut newly_bound = Vec::new();
        if let Some(sme_user_id) = request.sme_user_id {
            newly_bound.extend(
                self.upsert_assignment(review, &existing, AssignmentRole::Sme, sme_user_id, request.due_at, actor)
                    .await?,
            );
        }
        newly_bound.extend(
            self.upsert_assignment(
                review,
                &existing,
                AssignmentRole::Approver,
                request.approver_user_id,
                request.due_at,
                actor,
            )
            .await?,
        );

        let mut data = FieldUpdates::new();
        if let Some(config) = &config {
            config.attach_to(&mut data);
        }

        let previous_status = review.status.clone();
        let transition = self.apply_action(review, ReviewAction::Assign, &data, actor);
        review.last_updated_by = Some(actor);
        review.updated_at = Utc::now();

        let outcome = StepOutcome {
            previous_status,
            action: Some(ReviewAction::Assign),
            transition,
        };
        let effects = self.persist_and_apply(review, &outcome).await;
        self.notify_assignees(review, &newly_bound).await;
        effects?;
        Ok(outcome)
    }

    /// Tell each newly bound assignee about the assignment. Failures are logged only.
    async fn notify_assignees(&self, review: &Review, assignments: &[Assignment]) {
        for assignment in assignments {
            if let Err(e) = self.services().notifier.notify_assigned(review, assignment).await {
                warn!(
                    review_id = review.review_id,
                    user_id = %assignment.user_id,
                    role = %assignment.role,
                    error = %e,
                    "Assignment notification failed"
                );
            }
        }
    }

    /// Create or move the active assignment for `role`. Returns the saved
    /// record when `user_id` is newly bound to the review.
    async fn upsert_assignment(
        &self,
        review: &Review,
        existing: &[Assignment],
        role: AssignmentRole,
        user_id: Uuid,
        due_at: Option<DateTime<Utc>>,
        actor: Uuid,
    ) -> Result<Option<Assignment>> {
        let current = existing
            .iter()
            .find(|a| a.role == role && a.status.grants_role());

        let (assignment, newly_bound) = match current {
            Some(current) if current.user_id == user_id => {
                if current.due_at == due_at {
                    return Ok(None);
                }
                let mut updated = current.clone();
                updated.due_at = due_at;
                (updated, false)
            }
            Some(current) => {
                let mut moved = current.clone();
                moved.reassign_to(user_id, REASSIGNED_DURING_ASSIGNMENT);
                moved.assigned_by = actor;
                moved.assigned_at = Utc::now();
                moved.due_at = due_at;
                debug!(
                    review_id = review.review_id,
                    role = %role,
                    from = ?moved.reassigned_from_user_id,
                    to = %user_id,
                    "Reassigning review"
                );
                (moved, true)
            }
            None => (Assignment::pending(review.review_id, user_id, role, actor, due_at), true),
        };

        let saved = self.store().save_assignment(assignment).await?;
        Ok(newly_bound.then_some(saved))
    }

    /// Force-cancel a review. Only administrators may cancel; cancelling a
    /// review that is already terminal changes nothing.
    pub async fn cancel_review(&self, review: &mut Review, actor: Uuid) -> Result<StepOutcome> {
        if !self.services().admins.is_admin(actor).await? {
            return Err(AccessError::AdminRequired {
                operation: "cancel a review",
            }
            .into());
        }

        if review.is_terminal() {
            debug!(review_id = review.review_id, status = %review.status, "Review already terminal, cancel ignored");
            return Ok(Self::unchanged(review, Some(ReviewAction::Cancel)));
        }

        let previous_status = review.status.clone();
        let transition = self.apply_action(review, ReviewAction::Cancel, &FieldUpdates::new(), actor);
        review.last_updated_by = Some(actor);
        review.updated_at = Utc::now();

        let outcome = StepOutcome {
            previous_status,
            action: Some(ReviewAction::Cancel),
            transition,
        };
        self.persist_and_apply(review, &outcome).await?;
        info!(review_id = review.review_id, cancelled_by = %actor, "Review cancelled");
        Ok(outcome)
    }
}
