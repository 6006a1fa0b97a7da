use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Role a user is bound to on a review
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentRole {
    Sme,
    Approver,
}

impl AssignmentRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sme => "sme",
            Self::Approver => "approver",
        }
    }
}

impl fmt::Display for AssignmentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assignment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Pending,
    Accepted,
    Declined,
    Reassigned,
    Completed,
    Cancelled,
}

impl AssignmentStatus {
    /// Declined and reassigned records no longer grant the role
    pub fn grants_role(&self) -> bool {
        !matches!(self, Self::Declined | Self::Reassigned)
    }

    /// Still waiting on the assignee; closed when the review terminates
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Accepted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Reassigned => "reassigned",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user bound to a review as SME or approver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub assignment_id: i64,
    pub review_id: i64,
    pub user_id: Uuid,
    pub role: AssignmentRole,
    pub status: AssignmentStatus,
    pub assigned_by: Uuid,
    pub assigned_at: DateTime<Utc>,
    pub due_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub reassigned_from_user_id: Option<Uuid>,
    pub reassigned_reason: Option<String>,
}

impl Assignment {
    /// New pending assignment; the store allocates `assignment_id`
    pub fn pending(
        review_id: i64,
        user_id: Uuid,
        role: AssignmentRole,
        assigned_by: Uuid,
        due_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            assignment_id: 0,
            review_id,
            user_id,
            role,
            status: AssignmentStatus::Pending,
            assigned_by,
            assigned_at: Utc::now(),
            due_at,
            completed_at: None,
            reassigned_from_user_id: None,
            reassigned_reason: None,
        }
    }

    /// Whether this record currently authorizes `user_id` for `role`
    pub fn authorizes(&self, user_id: Uuid, role: AssignmentRole) -> bool {
        self.user_id == user_id && self.role == role && self.status.grants_role()
    }

    /// Move the assignment to another user, resetting it to pending
    pub fn reassign_to(&mut self, user_id: Uuid, reason: impl Into<String>) {
        if self.user_id == user_id {
            return;
        }
        self.reassigned_from_user_id = Some(self.user_id);
        self.reassigned_reason = Some(reason.into());
        self.user_id = user_id;
        self.status = AssignmentStatus::Pending;
    }

    /// Close an open assignment when its review terminates
    pub fn close(&mut self, status: AssignmentStatus) -> bool {
        if !self.status.is_open() {
            return false;
        }
        self.status = status;
        self.completed_at = Some(Utc::now());
        true
    }
}
