//! # Collaborator Services
//!
//! Traits for everything the workflow core needs from the outside world:
//! persistence of reviews and assignments, assignment and admin lookups,
//! lookup-option configuration, and status-change notification.
//!
//! The core never talks to a database directly. Hosts implement these traits
//! over their own storage; [`in_memory`] provides implementations backed by
//! concurrent maps for embedding and tests.

pub mod in_memory;

use crate::models::{Assignment, AssignmentRole, AssignmentStatus, Review, ReviewChecklist};
use crate::state_machine::{ActionConfig, ReviewState};
use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

pub use in_memory::{InMemoryReviewStore, StaticActionConfigs, StaticAdminDirectory};

/// Errors reported by collaborator services
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Lookup-option configuration for a (category, value) pair
#[async_trait]
pub trait ActionConfigLookup: Send + Sync {
    async fn get_action_config(&self, category: &str, value: &str) -> ServiceResult<Option<ActionConfig>>;
}

/// Whether a user holds an assignment granting a role on a review
#[async_trait]
pub trait AssignmentLookup: Send + Sync {
    async fn is_user_assigned(&self, review_id: i64, user_id: Uuid, role: AssignmentRole) -> ServiceResult<bool>;
}

#[async_trait]
pub trait AdminCheck: Send + Sync {
    async fn is_admin(&self, user_id: Uuid) -> ServiceResult<bool>;
}

/// Delivers review notifications: status changes to the involved users and
/// new assignments to the assignee
#[async_trait]
pub trait StatusChangeNotifier: Send + Sync {
    async fn notify_status_change(
        &self,
        review: &Review,
        old_status: &str,
        new_status: ReviewState,
        changed_by: Uuid,
    ) -> ServiceResult<()>;

    /// `assignment.user_id` has just been bound to the review, new or reassigned
    async fn notify_assigned(&self, review: &Review, assignment: &Assignment) -> ServiceResult<()>;
}

/// Persistence for reviews and their satellite records
#[async_trait]
pub trait ReviewStore: Send + Sync {
    /// Store a new review, allocating its id
    async fn insert_review(&self, review: Review) -> ServiceResult<Review>;

    async fn save_review(&self, review: &Review) -> ServiceResult<()>;

    async fn find_review(&self, review_id: i64) -> ServiceResult<Option<Review>>;

    /// A review of the material whose status is not terminal
    async fn find_active_review(&self, material_number: i64) -> ServiceResult<Option<Review>>;

    /// Mark approved, not yet superseded reviews of the material as superseded,
    /// except `current_review_id`. Returns the ids that were changed.
    async fn supersede_previous_approvals(
        &self,
        material_number: i64,
        current_review_id: i64,
    ) -> ServiceResult<Vec<i64>>;

    async fn list_assignments(&self, review_id: i64) -> ServiceResult<Vec<Assignment>>;

    /// Insert (`assignment_id == 0`) or update an assignment
    async fn save_assignment(&self, assignment: Assignment) -> ServiceResult<Assignment>;

    /// Close pending and accepted assignments of a review. Returns how many changed.
    async fn close_open_assignments(&self, review_id: i64, status: AssignmentStatus) -> ServiceResult<usize>;

    async fn find_checklist(&self, review_id: i64) -> ServiceResult<Option<ReviewChecklist>>;

    async fn save_checklist(&self, checklist: ReviewChecklist) -> ServiceResult<()>;

    /// Distinct users who have commented on the review
    async fn commenter_ids(&self, review_id: i64) -> ServiceResult<Vec<Uuid>>;
}
