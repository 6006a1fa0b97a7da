use crate::state_machine::{ReviewState, StepName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a user relates to a review, as resolved by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Initiator,
    Sme,
    Approver,
    Admin,
    Viewer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiator => "initiator",
            Self::Sme => "sme",
            Self::Approver => "approver",
            Self::Admin => "admin",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Steps a user may edit right now and a line of guidance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserReviewContext {
    pub role: UserRole,
    pub editable_steps: Vec<StepName>,
    pub guidance: Option<String>,
}

const INITIAL_STEPS: [StepName; 3] = [StepName::GeneralInfo, StepName::Checklist, StepName::Assignment];
const DECISION_STEPS: [StepName; 2] = [StepName::FollowUp, StepName::FinalDecision];

/// Editable steps and guidance for `role` at `status`.
///
/// Administrators see the steps of the current phase but still need an
/// assignment to write SME or approver fields.
pub fn user_context(role: UserRole, status: &str) -> UserReviewContext {
    let state = status.parse::<ReviewState>().ok();
    let (editable_steps, guidance): (Vec<StepName>, &str) = match role {
        UserRole::Admin => match state {
            Some(ReviewState::Draft | ReviewState::PendingAssignment) => (
                INITIAL_STEPS.to_vec(),
                "You have admin access. Complete the initial details and assign reviewers.",
            ),
            Some(ReviewState::PendingSme) => (
                vec![StepName::SmeInvestigation],
                "You have admin access. The SME review step is active.",
            ),
            Some(ReviewState::PendingDecision) => (
                DECISION_STEPS.to_vec(),
                "You have admin access. The final decision step is active.",
            ),
            _ => (Vec::new(), "You have admin access. This review is in a terminal state."),
        },
        UserRole::Initiator => match state {
            Some(ReviewState::Draft | ReviewState::PendingAssignment) => (
                INITIAL_STEPS.to_vec(),
                "Complete the initial review details and assign reviewers.",
            ),
            _ => (
                Vec::new(),
                "You initiated this review. It's now with the assigned reviewers.",
            ),
        },
        UserRole::Sme => match state {
            Some(ReviewState::PendingSme) => (
                vec![StepName::SmeInvestigation],
                "Please complete your SME review and provide your recommendation.",
            ),
            Some(ReviewState::PendingDecision) => {
                (Vec::new(), "Your SME review is complete. Awaiting final decision.")
            }
            _ => (Vec::new(), "This review is not yet ready for your SME review."),
        },
        UserRole::Approver => match state {
            Some(ReviewState::PendingDecision) => (
                DECISION_STEPS.to_vec(),
                "Review the SME feedback and make your final decision.",
            ),
            Some(ReviewState::Approved | ReviewState::Rejected) => {
                (Vec::new(), "You completed the final decision for this review.")
            }
            _ => (Vec::new(), "This review is not yet ready for your decision."),
        },
        UserRole::Viewer => (Vec::new(), "You have view-only access to this review."),
    };

    UserReviewContext {
        role,
        editable_steps,
        guidance: Some(guidance.to_string()),
    }
}
