//! Field groups and the status-to-editable-fields mapping.

use crate::models::CHECKLIST_FIELDS;
use crate::state_machine::ReviewState;
use std::collections::BTreeSet;

/// General information written by the initiator
pub const GENERAL_INFO_FIELDS: [&str; 6] = [
    "review_reason",
    "months_no_movement",
    "proposed_action",
    "proposed_safety_stock_qty",
    "proposed_unrestricted_qty",
    "business_justification",
];

/// Writable only by the active SME assignee
pub const SME_RESTRICTED_FIELDS: [&str; 6] = [
    "sme_recommendation",
    "sme_recommended_safety_stock_qty",
    "sme_recommended_unrestricted_qty",
    "sme_analysis",
    "alternative_applications",
    "risk_assessment",
];

pub const FOLLOW_UP_FIELDS: [&str; 4] = [
    "requires_follow_up",
    "next_review_date",
    "follow_up_reason",
    "review_frequency_weeks",
];

pub const FINAL_DECISION_FIELDS: [&str; 6] = [
    "final_decision",
    "final_safety_stock_qty",
    "final_unrestricted_qty",
    "final_notes",
    "estimated_savings",
    "implementation_date",
];

/// General information plus checklist answers
pub fn initiator_fields() -> BTreeSet<&'static str> {
    GENERAL_INFO_FIELDS
        .iter()
        .chain(CHECKLIST_FIELDS.iter())
        .copied()
        .collect()
}

pub fn sme_restricted_fields() -> BTreeSet<&'static str> {
    SME_RESTRICTED_FIELDS.iter().copied().collect()
}

/// Writable only by the active approver assignee: follow-up plus final decision
pub fn approver_restricted_fields() -> BTreeSet<&'static str> {
    FOLLOW_UP_FIELDS
        .iter()
        .chain(FINAL_DECISION_FIELDS.iter())
        .copied()
        .collect()
}

/// Fields that may be written while a review sits at `status`.
///
/// Terminal and unknown statuses allow nothing.
pub fn editable_fields_for_status(status: &str) -> BTreeSet<&'static str> {
    match status.parse::<ReviewState>() {
        Ok(ReviewState::Draft | ReviewState::PendingAssignment) => initiator_fields(),
        Ok(ReviewState::PendingSme) => sme_restricted_fields(),
        Ok(ReviewState::PendingDecision) => approver_restricted_fields(),
        _ => BTreeSet::new(),
    }
}
