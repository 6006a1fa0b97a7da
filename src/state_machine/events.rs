use serde::{Deserialize, Serialize};
use std::fmt;

/// Actions that can trigger review state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    /// Initiator finished the checklist
    CompleteChecklist,
    /// SME and approver have been assigned
    Assign,
    /// SME submitted the investigation
    SubmitSmeReview,
    /// Approver approved the proposal
    Approve,
    /// Approver rejected the proposal
    Reject,
    /// Abandon the review from any non-terminal state
    Cancel,
}

impl ReviewAction {
    pub const ALL: [ReviewAction; 6] = [
        Self::CompleteChecklist,
        Self::Assign,
        Self::SubmitSmeReview,
        Self::Approve,
        Self::Reject,
        Self::Cancel,
    ];

    /// Get a string representation of the action for logging
    pub fn action_type(&self) -> &'static str {
        match self {
            Self::CompleteChecklist => "complete_checklist",
            Self::Assign => "assign",
            Self::SubmitSmeReview => "submit_sme_review",
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::Cancel => "cancel",
        }
    }

    /// Check if this action always lands in a terminal state when it fires
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approve | Self::Reject | Self::Cancel)
    }
}

impl fmt::Display for ReviewAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.action_type())
    }
}

impl std::str::FromStr for ReviewAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "complete_checklist" => Ok(Self::CompleteChecklist),
            "assign" => Ok(Self::Assign),
            "submit_sme_review" => Ok(Self::SubmitSmeReview),
            "approve" => Ok(Self::Approve),
            "reject" => Ok(Self::Reject),
            "cancel" => Ok(Self::Cancel),
            _ => Err(format!("Invalid review action: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_round_trip_through_str() {
        for action in ReviewAction::ALL {
            assert_eq!(action.action_type().parse::<ReviewAction>().unwrap(), action);
        }
        assert!("resolve_manually".parse::<ReviewAction>().is_err());
    }

    #[test]
    fn test_terminal_actions() {
        assert!(ReviewAction::Approve.is_terminal());
        assert!(ReviewAction::Cancel.is_terminal());
        assert!(!ReviewAction::Assign.is_terminal());
    }
}
