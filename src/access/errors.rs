use crate::models::AssignmentRole;
use thiserror::Error;

/// Rejected field writes and step submissions.
///
/// Field lists are sorted and contain exactly the offending names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Cannot edit review with status '{status}'. Review is locked.")]
    ReviewLocked { status: String },

    #[error("Cannot update these fields at status '{status}': {fields:?}. These fields are locked after workflow progression.")]
    StatusLocked { status: String, fields: Vec<String> },

    #[error("You don't have permission to update these fields: {fields:?}. Only the assigned {} can update {} fields.", role_label(.role), role_scope(.role))]
    RoleRestricted {
        role: AssignmentRole,
        fields: Vec<String>,
    },

    #[error("You are not assigned as the {role} for this review")]
    NotAssigned { role: AssignmentRole },

    #[error("Only administrators may {operation}")]
    AdminRequired { operation: &'static str },
}

impl AccessError {
    /// Offending field names, for the two field gates
    pub fn fields(&self) -> &[String] {
        match self {
            Self::StatusLocked { fields, .. } | Self::RoleRestricted { fields, .. } => fields,
            _ => &[],
        }
    }
}

fn role_label(role: &AssignmentRole) -> &'static str {
    match role {
        AssignmentRole::Sme => "SME",
        AssignmentRole::Approver => "approver",
    }
}

fn role_scope(role: &AssignmentRole) -> &'static str {
    match role {
        AssignmentRole::Sme => "SME investigation",
        AssignmentRole::Approver => "final decision",
    }
}
