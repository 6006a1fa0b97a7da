use super::{
    ActionConfigLookup, AdminCheck, AssignmentLookup, ReviewStore, ServiceError, ServiceResult,
};
use crate::config::ReviewWorkflowConfig;
use crate::models::{Assignment, AssignmentRole, AssignmentStatus, Review, ReviewChecklist};
use crate::state_machine::{ActionConfig, ReviewState};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

/// Review storage backed by concurrent maps
#[derive(Debug)]
pub struct InMemoryReviewStore {
    reviews: DashMap<i64, Review>,
    assignments: DashMap<i64, Assignment>,
    checklists: DashMap<i64, ReviewChecklist>,
    comments: DashMap<i64, Vec<Uuid>>,
    next_review_id: AtomicI64,
    next_assignment_id: AtomicI64,
    failing: Mutex<HashSet<&'static str>>,
}

impl Default for InMemoryReviewStore {
    fn default() -> Self {
        Self {
            reviews: DashMap::new(),
            assignments: DashMap::new(),
            checklists: DashMap::new(),
            comments: DashMap::new(),
            next_review_id: AtomicI64::new(1),
            next_assignment_id: AtomicI64::new(1),
            failing: Mutex::new(HashSet::new()),
        }
    }
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `user_id` commented on a review
    pub fn record_comment(&self, review_id: i64, user_id: Uuid) {
        let mut commenters = self.comments.entry(review_id).or_default();
        if !commenters.contains(&user_id) {
            commenters.push(user_id);
        }
    }

    /// Make the named store operation fail until cleared
    pub fn fail_operation(&self, operation: &'static str) {
        self.failing.lock().insert(operation);
    }

    pub fn clear_failures(&self) {
        self.failing.lock().clear();
    }

    pub fn review_count(&self) -> usize {
        self.reviews.len()
    }

    fn check(&self, operation: &'static str) -> ServiceResult<()> {
        if self.failing.lock().contains(operation) {
            return Err(ServiceError::Storage(format!("{operation} unavailable")));
        }
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for InMemoryReviewStore {
    async fn insert_review(&self, mut review: Review) -> ServiceResult<Review> {
        self.check("insert_review")?;
        review.review_id = self.next_review_id.fetch_add(1, Ordering::SeqCst);
        self.reviews.insert(review.review_id, review.clone());
        Ok(review)
    }

    async fn save_review(&self, review: &Review) -> ServiceResult<()> {
        self.check("save_review")?;
        match self.reviews.get_mut(&review.review_id) {
            Some(mut stored) => {
                *stored = review.clone();
                Ok(())
            }
            None => Err(ServiceError::NotFound {
                entity: "review",
                id: review.review_id.to_string(),
            }),
        }
    }

    async fn find_review(&self, review_id: i64) -> ServiceResult<Option<Review>> {
        self.check("find_review")?;
        Ok(self.reviews.get(&review_id).map(|r| r.clone()))
    }

    async fn find_active_review(&self, material_number: i64) -> ServiceResult<Option<Review>> {
        self.check("find_active_review")?;
        Ok(self
            .reviews
            .iter()
            .filter(|r| r.material_number == material_number && !r.is_terminal())
            .min_by_key(|r| r.review_id)
            .map(|r| r.clone()))
    }

    async fn supersede_previous_approvals(
        &self,
        material_number: i64,
        current_review_id: i64,
    ) -> ServiceResult<Vec<i64>> {
        self.check("supersede_previous_approvals")?;
        let mut superseded = Vec::new();
        for mut review in self.reviews.iter_mut() {
            if review.material_number == material_number
                && review.review_id != current_review_id
                && review.state() == Some(ReviewState::Approved)
                && !review.is_superseded
            {
                review.is_superseded = true;
                superseded.push(review.review_id);
            }
        }
        superseded.sort_unstable();
        Ok(superseded)
    }

    async fn list_assignments(&self, review_id: i64) -> ServiceResult<Vec<Assignment>> {
        self.check("list_assignments")?;
        let mut assignments: Vec<Assignment> = self
            .assignments
            .iter()
            .filter(|a| a.review_id == review_id)
            .map(|a| a.clone())
            .collect();
        assignments.sort_by_key(|a| a.assignment_id);
        Ok(assignments)
    }

    async fn save_assignment(&self, mut assignment: Assignment) -> ServiceResult<Assignment> {
        self.check("save_assignment")?;
        if assignment.assignment_id == 0 {
            assignment.assignment_id = self.next_assignment_id.fetch_add(1, Ordering::SeqCst);
        }
        self.assignments
            .insert(assignment.assignment_id, assignment.clone());
        Ok(assignment)
    }

    async fn close_open_assignments(&self, review_id: i64, status: AssignmentStatus) -> ServiceResult<usize> {
        self.check("close_open_assignments")?;
        let mut closed = 0;
        for mut assignment in self.assignments.iter_mut() {
            if assignment.review_id == review_id && assignment.close(status) {
                closed += 1;
            }
        }
        Ok(closed)
    }

    async fn find_checklist(&self, review_id: i64) -> ServiceResult<Option<ReviewChecklist>> {
        self.check("find_checklist")?;
        Ok(self.checklists.get(&review_id).map(|c| c.clone()))
    }

    async fn save_checklist(&self, checklist: ReviewChecklist) -> ServiceResult<()> {
        self.check("save_checklist")?;
        self.checklists.insert(checklist.review_id, checklist);
        Ok(())
    }

    async fn commenter_ids(&self, review_id: i64) -> ServiceResult<Vec<Uuid>> {
        self.check("commenter_ids")?;
        Ok(self
            .comments
            .get(&review_id)
            .map(|c| c.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl AssignmentLookup for InMemoryReviewStore {
    async fn is_user_assigned(&self, review_id: i64, user_id: Uuid, role: AssignmentRole) -> ServiceResult<bool> {
        self.check("is_user_assigned")?;
        Ok(self
            .assignments
            .iter()
            .any(|a| a.review_id == review_id && a.authorizes(user_id, role)))
    }
}

/// Fixed set of administrator user ids
#[derive(Debug, Default)]
pub struct StaticAdminDirectory {
    admins: RwLock<HashSet<Uuid>>,
}

impl StaticAdminDirectory {
    pub fn new(admins: impl IntoIterator<Item = Uuid>) -> Self {
        Self {
            admins: RwLock::new(admins.into_iter().collect()),
        }
    }

    pub fn grant_admin(&self, user_id: Uuid) {
        self.admins.write().insert(user_id);
    }

    pub fn revoke_admin(&self, user_id: Uuid) {
        self.admins.write().remove(&user_id);
    }
}

#[async_trait]
impl AdminCheck for StaticAdminDirectory {
    async fn is_admin(&self, user_id: Uuid) -> ServiceResult<bool> {
        Ok(self.admins.read().contains(&user_id))
    }
}

/// Lookup-option configuration held in memory
#[derive(Debug, Default, Clone)]
pub struct StaticActionConfigs {
    entries: HashMap<(String, String), ActionConfig>,
}

impl StaticActionConfigs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries from the `action_configs` table of the workflow configuration,
    /// registered under the configured proposed-action category
    pub fn from_config(config: &ReviewWorkflowConfig) -> Self {
        let category = &config.workflow.action_config_category;
        let mut configs = Self::new();
        for (value, action_config) in &config.action_configs {
            configs.insert(category.clone(), value.clone(), action_config.clone());
        }
        configs
    }

    pub fn insert(&mut self, category: impl Into<String>, value: impl Into<String>, config: ActionConfig) {
        self.entries.insert((category.into(), value.into()), config);
    }

    pub fn with(mut self, category: impl Into<String>, value: impl Into<String>, config: ActionConfig) -> Self {
        self.insert(category, value, config);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ActionConfigLookup for StaticActionConfigs {
    async fn get_action_config(&self, category: &str, value: &str) -> ServiceResult<Option<ActionConfig>> {
        Ok(self
            .entries
            .get(&(category.to_string(), value.to_string()))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_supersede_only_touches_other_approved_reviews() {
        let store = InMemoryReviewStore::new();
        let initiator = Uuid::new_v4();

        let mut old = store.insert_review(Review::new_draft(0, 42, initiator)).await.unwrap();
        old.status = ReviewState::Approved.to_string();
        store.save_review(&old).await.unwrap();

        let mut rejected = store.insert_review(Review::new_draft(0, 42, initiator)).await.unwrap();
        rejected.status = ReviewState::Rejected.to_string();
        store.save_review(&rejected).await.unwrap();

        let mut other_material = store.insert_review(Review::new_draft(0, 43, initiator)).await.unwrap();
        other_material.status = ReviewState::Approved.to_string();
        store.save_review(&other_material).await.unwrap();

        let mut current = store.insert_review(Review::new_draft(0, 42, initiator)).await.unwrap();
        current.status = ReviewState::Approved.to_string();
        store.save_review(&current).await.unwrap();

        let superseded = store
            .supersede_previous_approvals(42, current.review_id)
            .await
            .unwrap();
        assert_eq!(superseded, vec![old.review_id]);

        let again = store
            .supersede_previous_approvals(42, current.review_id)
            .await
            .unwrap();
        assert!(again.is_empty());

        let current = store.find_review(current.review_id).await.unwrap().unwrap();
        assert!(!current.is_superseded);
    }

    #[tokio::test]
    async fn test_assignment_lookup_ignores_declined() {
        let store = InMemoryReviewStore::new();
        let sme = Uuid::new_v4();
        let mut assignment = store
            .save_assignment(Assignment::pending(5, sme, AssignmentRole::Sme, Uuid::new_v4(), None))
            .await
            .unwrap();
        assert!(store.is_user_assigned(5, sme, AssignmentRole::Sme).await.unwrap());
        assert!(!store.is_user_assigned(5, sme, AssignmentRole::Approver).await.unwrap());

        assignment.status = AssignmentStatus::Declined;
        store.save_assignment(assignment).await.unwrap();
        assert!(!store.is_user_assigned(5, sme, AssignmentRole::Sme).await.unwrap());
    }

    #[tokio::test]
    async fn test_injected_failure_surfaces_as_storage_error() {
        let store = InMemoryReviewStore::new();
        store.fail_operation("close_open_assignments");
        let result = store.close_open_assignments(1, AssignmentStatus::Completed).await;
        assert!(matches!(result, Err(ServiceError::Storage(_))));

        store.clear_failures();
        assert_eq!(store.close_open_assignments(1, AssignmentStatus::Completed).await, Ok(0));
    }

    #[tokio::test]
    async fn test_static_configs_lookup_by_category_and_value() {
        let configs = StaticActionConfigs::new().with(
            "proposed_action",
            "scrap",
            ActionConfig::requiring_sme(true),
        );
        assert!(configs
            .get_action_config("proposed_action", "scrap")
            .await
            .unwrap()
            .is_some_and(|c| c.requires_sme));
        assert!(configs
            .get_action_config("other", "scrap")
            .await
            .unwrap()
            .is_none());
    }
}
