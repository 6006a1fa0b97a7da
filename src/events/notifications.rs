//! Status-change and assignment notifications delivered through the
//! [`EventPublisher`].

use super::publisher::EventPublisher;
use crate::constants::events::{REVIEW_ASSIGNED, REVIEW_STATUS_CHANGED};
use crate::models::{Assignment, AssignmentRole, Review};
use crate::services::{ReviewStore, ServiceResult, StatusChangeNotifier};
use crate::state_machine::ReviewState;
use async_trait::async_trait;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Publishes one `review.status_changed` event per transition, addressed to
/// the review's involved users minus whoever made the change, and one
/// `review.assigned` event per new assignee
pub struct BroadcastStatusNotifier {
    publisher: EventPublisher,
    store: Arc<dyn ReviewStore>,
}

impl BroadcastStatusNotifier {
    pub fn new(publisher: EventPublisher, store: Arc<dyn ReviewStore>) -> Self {
        Self { publisher, store }
    }

    pub fn publisher(&self) -> &EventPublisher {
        &self.publisher
    }

    /// Initiator, assignees still holding their role, and commenters
    pub async fn involved_users(&self, review: &Review) -> ServiceResult<BTreeSet<Uuid>> {
        let mut users = BTreeSet::from([review.initiated_by]);

        for assignment in self.store.list_assignments(review.review_id).await? {
            if assignment.status.grants_role() {
                users.insert(assignment.user_id);
            }
        }
        users.extend(self.store.commenter_ids(review.review_id).await?);

        Ok(users)
    }
}

#[async_trait]
impl StatusChangeNotifier for BroadcastStatusNotifier {
    async fn notify_status_change(
        &self,
        review: &Review,
        old_status: &str,
        new_status: ReviewState,
        changed_by: Uuid,
    ) -> ServiceResult<()> {
        let mut recipients = self.involved_users(review).await?;
        recipients.remove(&changed_by);

        let payload = json!({
            "material_number": review.material_number,
            "old_status": old_status,
            "new_status": new_status.as_str(),
            "changed_by": changed_by,
            "title": format!("Status changed: Material {}", review.material_number),
            "message": format!("Review status changed from '{old_status}' to '{new_status}'."),
        });

        let delivered = self.publisher.publish(
            REVIEW_STATUS_CHANGED,
            review.review_id,
            recipients.into_iter().collect(),
            payload,
        );
        debug!(review_id = review.review_id, subscribers = delivered, "Published status change");
        Ok(())
    }

    async fn notify_assigned(&self, review: &Review, assignment: &Assignment) -> ServiceResult<()> {
        let role_label = match assignment.role {
            AssignmentRole::Sme => "SME",
            AssignmentRole::Approver => "approver",
        };
        let payload = json!({
            "material_number": review.material_number,
            "assignment_id": assignment.assignment_id,
            "role": assignment.role,
            "assigned_by": assignment.assigned_by,
            "due_at": assignment.due_at,
            "title": format!("New review assigned: Material {}", review.material_number),
            "message": format!(
                "You have been assigned as {role_label} for the review of material {}.",
                review.material_number
            ),
        });

        let delivered = self.publisher.publish(
            REVIEW_ASSIGNED,
            review.review_id,
            vec![assignment.user_id],
            payload,
        );
        debug!(
            review_id = review.review_id,
            user_id = %assignment.user_id,
            role = %assignment.role,
            subscribers = delivered,
            "Published assignment"
        );
        Ok(())
    }
}
