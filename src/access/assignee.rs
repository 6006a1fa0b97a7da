use super::errors::AccessError;
use crate::error::Result;
use crate::models::AssignmentRole;
use crate::services::{AdminCheck, AssignmentLookup};
use crate::state_machine::StepName;
use tracing::debug;
use uuid::Uuid;

/// Assignment role a user must hold to submit `step`, if any
pub fn step_assignee_role(step: StepName) -> Option<AssignmentRole> {
    match step {
        StepName::SmeInvestigation => Some(AssignmentRole::Sme),
        StepName::FinalDecision => Some(AssignmentRole::Approver),
        _ => None,
    }
}

/// Check that `user_id` may submit a step on behalf of the `role` assignee.
///
/// Administrators pass without an assignment. This is intentionally looser
/// than [`super::FieldAccessPolicy::check_role_restrictions`], which has no
/// administrator exemption: passing here does not let an unassigned
/// administrator write SME or approver fields.
pub async fn validate_assignee(
    review_id: i64,
    user_id: Uuid,
    role: AssignmentRole,
    admins: &dyn AdminCheck,
    assignments: &dyn AssignmentLookup,
) -> Result<()> {
    if admins.is_admin(user_id).await? {
        debug!(review_id, user_id = %user_id, role = %role, "Administrator passes assignee check");
        return Ok(());
    }

    if assignments.is_user_assigned(review_id, user_id, role).await? {
        return Ok(());
    }

    Err(AccessError::NotAssigned { role }.into())
}
