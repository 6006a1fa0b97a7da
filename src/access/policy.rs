//! # Field Access Policy
//!
//! Two gates decide whether a set of field updates may be written:
//!
//! - **Status lock**: every submitted field must belong to the editable set of
//!   the review's current status. This is what freezes earlier workflow phases
//!   once the review has moved on.
//! - **Role restriction**: SME fields need an active SME assignment and
//!   approver fields an active approver assignment, whatever the status.
//!
//! Both gates run before anything is mutated and both must pass. The status
//! lock is checked first so a caller sees the phase problem before the role
//! problem.
//!
//! ## No admin bypass
//!
//! The role gate has no administrator exemption. An administrator has to
//! assign themselves as SME or approver to write those fields. The step-level
//! check in [`super::validate_assignee`] does let administrators through, so
//! an unassigned administrator can submit an SME step containing only
//! unrestricted fields but cannot write `sme_analysis`. Keep the two checks
//! separate.

use super::errors::AccessError;
use super::field_sets::{approver_restricted_fields, editable_fields_for_status, sme_restricted_fields};
use crate::error::Result;
use crate::logging::log_access_denied;
use crate::models::{AssignmentRole, FieldUpdates, Review};
use crate::services::AssignmentLookup;
use crate::state_machine::states;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

/// Field-level authorization for review updates
#[derive(Clone)]
pub struct FieldAccessPolicy {
    assignments: Arc<dyn AssignmentLookup>,
}

impl std::fmt::Debug for FieldAccessPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldAccessPolicy").finish_non_exhaustive()
    }
}

impl FieldAccessPolicy {
    pub fn new(assignments: Arc<dyn AssignmentLookup>) -> Self {
        Self { assignments }
    }

    /// Reject any write to a review in a terminal status
    pub fn validate_can_edit(review: &Review) -> std::result::Result<(), AccessError> {
        if states::is_terminal(&review.status) {
            return Err(AccessError::ReviewLocked {
                status: review.status.clone(),
            });
        }
        Ok(())
    }

    /// Reject fields outside the editable set for `status`
    pub fn check_status_lock(status: &str, updates: &FieldUpdates) -> std::result::Result<(), AccessError> {
        let editable = editable_fields_for_status(status);
        let locked: Vec<String> = updates
            .keys()
            .filter(|name| !editable.contains(name.as_str()))
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        if locked.is_empty() {
            return Ok(());
        }
        Err(AccessError::StatusLocked {
            status: status.to_string(),
            fields: locked,
        })
    }

    /// Reject role-restricted fields the user holds no active assignment for
    pub async fn check_role_restrictions(
        &self,
        review_id: i64,
        user_id: Uuid,
        updates: &FieldUpdates,
    ) -> Result<()> {
        let gated = [
            (AssignmentRole::Sme, sme_restricted_fields()),
            (AssignmentRole::Approver, approver_restricted_fields()),
        ];

        for (role, restricted) in gated {
            let attempted: Vec<String> = updates
                .keys()
                .filter(|name| restricted.contains(name.as_str()))
                .cloned()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            if attempted.is_empty() {
                continue;
            }

            if !self.assignments.is_user_assigned(review_id, user_id, role).await? {
                return Err(AccessError::RoleRestricted {
                    role,
                    fields: attempted,
                }
                .into());
            }
        }
        Ok(())
    }

    /// Run the terminal lock and both field gates for one update
    pub async fn authorize_update(&self, review: &Review, user_id: Uuid, updates: &FieldUpdates) -> Result<()> {
        let outcome = match Self::validate_can_edit(review)
            .and_then(|_| Self::check_status_lock(&review.status, updates))
        {
            Ok(()) => self.check_role_restrictions(review.review_id, user_id, updates).await,
            Err(e) => Err(e.into()),
        };

        if let Err(crate::error::ReviewWorkflowError::Access(denied)) = &outcome {
            let gate = match denied {
                AccessError::ReviewLocked { .. } => "terminal_lock",
                AccessError::StatusLocked { .. } => "status_lock",
                AccessError::RoleRestricted { .. } => "role_restriction",
                _ => "access",
            };
            log_access_denied(review.review_id, user_id, &review.status, gate, denied.fields());
        }
        outcome
    }
}
