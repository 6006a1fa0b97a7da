use serde::{Deserialize, Serialize};
use std::fmt;

/// Review workflow states as persisted in the review's `status` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewState {
    /// Review created, general info and checklist phase
    Draft,
    /// Checklist complete, awaiting SME/approver assignment
    PendingAssignment,
    /// Assigned, awaiting SME investigation
    PendingSme,
    /// SME complete (or skipped), awaiting the approver's final decision
    PendingDecision,
    /// Review approved
    Approved,
    /// Review rejected
    Rejected,
    /// Review cancelled
    Cancelled,
}

/// UI-facing phase of the review form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    GeneralInfo,
    Checklist,
    Assignment,
    SmeInvestigation,
    FollowUp,
    FinalDecision,
}

/// Static metadata attached to every review state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StateMetadata {
    pub step: StepName,
    pub terminal: bool,
    pub description: &'static str,
}

impl ReviewState {
    pub const ALL: [ReviewState; 7] = [
        Self::Draft,
        Self::PendingAssignment,
        Self::PendingSme,
        Self::PendingDecision,
        Self::Approved,
        Self::Rejected,
        Self::Cancelled,
    ];

    /// Registry entry for this state
    pub const fn metadata(&self) -> StateMetadata {
        match self {
            Self::Draft => StateMetadata {
                step: StepName::GeneralInfo,
                terminal: false,
                description: "Review created, general info and checklist phase",
            },
            Self::PendingAssignment => StateMetadata {
                step: StepName::Assignment,
                terminal: false,
                description: "Checklist complete, awaiting SME/approver assignment",
            },
            Self::PendingSme => StateMetadata {
                step: StepName::SmeInvestigation,
                terminal: false,
                description: "Assigned, awaiting SME investigation",
            },
            Self::PendingDecision => StateMetadata {
                step: StepName::FinalDecision,
                terminal: false,
                description: "SME complete, awaiting approver's final decision",
            },
            Self::Approved => StateMetadata {
                step: StepName::FinalDecision,
                terminal: true,
                description: "Review approved, stock changes executed",
            },
            Self::Rejected => StateMetadata {
                step: StepName::FinalDecision,
                terminal: true,
                description: "Review rejected, no stock changes made",
            },
            Self::Cancelled => StateMetadata {
                step: StepName::GeneralInfo,
                terminal: true,
                description: "Review cancelled",
            },
        }
    }

    /// Check if this is a terminal state (no further transitions allowed)
    pub const fn is_terminal(&self) -> bool {
        self.metadata().terminal
    }

    /// UI step this state is displayed on
    pub const fn step(&self) -> StepName {
        self.metadata().step
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingAssignment => "pending_assignment",
            Self::PendingSme => "pending_sme",
            Self::PendingDecision => "pending_decision",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ReviewState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending_assignment" => Ok(Self::PendingAssignment),
            "pending_sme" => Ok(Self::PendingSme),
            "pending_decision" => Ok(Self::PendingDecision),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("Invalid review state: {s}")),
        }
    }
}

/// Default state for new reviews
impl Default for ReviewState {
    fn default() -> Self {
        Self::Draft
    }
}

impl StepName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GeneralInfo => "general_info",
            Self::Checklist => "checklist",
            Self::Assignment => "assignment",
            Self::SmeInvestigation => "sme_investigation",
            Self::FollowUp => "follow_up",
            Self::FinalDecision => "final_decision",
        }
    }
}

impl fmt::Display for StepName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StepName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "general_info" => Ok(Self::GeneralInfo),
            "checklist" => Ok(Self::Checklist),
            "assignment" => Ok(Self::Assignment),
            "sme_investigation" => Ok(Self::SmeInvestigation),
            "follow_up" => Ok(Self::FollowUp),
            "final_decision" => Ok(Self::FinalDecision),
            _ => Err(format!("Invalid review step: {s}")),
        }
    }
}

// Persisted statuses may predate the current state set, so every lookup by
// raw string degrades to "non-terminal, general_info" instead of failing.

/// Terminal check by persisted status string; unknown values are non-terminal
pub fn is_terminal(status: &str) -> bool {
    status
        .parse::<ReviewState>()
        .map(|state| state.is_terminal())
        .unwrap_or(false)
}

/// UI step for a persisted status string; unknown values map to `general_info`
pub fn step_for(status: &str) -> StepName {
    status
        .parse::<ReviewState>()
        .map(|state| state.step())
        .unwrap_or(StepName::GeneralInfo)
}

/// Registry lookup by persisted status string
pub fn metadata(status: &str) -> Option<StateMetadata> {
    status.parse::<ReviewState>().ok().map(|state| state.metadata())
}
