use material_review_core::config::ReviewWorkflowConfig;
use material_review_core::events::{BroadcastStatusNotifier, EventPublisher};
use material_review_core::models::{FieldUpdates, Review};
use material_review_core::orchestration::{AssignmentRequest, NewReview, ReviewServices};
use material_review_core::services::{InMemoryReviewStore, StaticActionConfigs, StaticAdminDirectory};
use material_review_core::state_machine::StepName;
use material_review_core::StepCompletionOrchestrator;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Build a field update map from a JSON object literal
pub fn fields(value: Value) -> FieldUpdates {
    value
        .as_object()
        .cloned()
        .expect("field updates must be a JSON object")
}

/// Every required checklist answer plus one optional note
pub fn checklist_answers() -> FieldUpdates {
    fields(json!({
        "has_open_orders": false,
        "has_forecast_demand": false,
        "checked_alternate_plants": true,
        "contacted_procurement": true,
        "reviewed_bom_usage": true,
        "checked_supersession": true,
        "checked_historical_usage": true,
        "procurement_feedback": "No objection to disposal",
    }))
}

/// Orchestrator wired to in-memory collaborators, with one user per role
pub struct Harness {
    pub orchestrator: StepCompletionOrchestrator,
    pub store: Arc<InMemoryReviewStore>,
    pub admins: Arc<StaticAdminDirectory>,
    pub publisher: EventPublisher,
    pub initiator: Uuid,
    pub sme: Uuid,
    pub approver: Uuid,
    pub admin: Uuid,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(ReviewWorkflowConfig::default(), StaticActionConfigs::new())
    }

    pub fn with_config(config: ReviewWorkflowConfig, action_configs: StaticActionConfigs) -> Self {
        let store = Arc::new(InMemoryReviewStore::new());
        let admin = Uuid::new_v4();
        let admins = Arc::new(StaticAdminDirectory::new([admin]));
        let publisher = EventPublisher::new(64);
        let notifier = Arc::new(BroadcastStatusNotifier::new(publisher.clone(), store.clone()));

        let services = ReviewServices {
            store: store.clone(),
            assignments: store.clone(),
            admins: admins.clone(),
            action_configs: Arc::new(action_configs),
            notifier,
        };

        Self {
            orchestrator: StepCompletionOrchestrator::new(&config, services),
            store,
            admins,
            publisher,
            initiator: Uuid::new_v4(),
            sme: Uuid::new_v4(),
            approver: Uuid::new_v4(),
            admin,
        }
    }

    pub async fn draft(&self, material_number: i64, proposed_action: &str) -> Review {
        self.orchestrator
            .create_review(NewReview {
                material_number,
                initiated_by: self.initiator,
                review_reason: Some("No movement for 24 months".to_string()),
                months_no_movement: Some(24),
                proposed_action: Some(proposed_action.to_string()),
                ..Default::default()
            })
            .await
            .expect("draft review")
    }

    pub async fn pending_assignment(&self, material_number: i64, proposed_action: &str) -> Review {
        let mut review = self.draft(material_number, proposed_action).await;
        self.orchestrator
            .submit_step(&mut review, StepName::Checklist, checklist_answers(), self.initiator)
            .await
            .expect("checklist step");
        review
    }

    pub async fn assign(&self, review: &mut Review) {
        self.orchestrator
            .complete_assignment_step(
                review,
                AssignmentRequest {
                    sme_user_id: Some(self.sme),
                    approver_user_id: self.approver,
                    due_at: None,
                },
                self.initiator,
            )
            .await
            .expect("assignment step");
    }

    /// Review waiting on the SME; the default fallback requires SME for any action
    pub async fn pending_sme(&self, material_number: i64) -> Review {
        let mut review = self.pending_assignment(material_number, "scrap").await;
        self.assign(&mut review).await;
        review
    }

    pub async fn pending_decision(&self, material_number: i64) -> Review {
        let mut review = self.pending_sme(material_number).await;
        self.orchestrator
            .submit_step(
                &mut review,
                StepName::SmeInvestigation,
                fields(json!({ "sme_recommendation": "scrap", "sme_analysis": "Obsolete part" })),
                self.sme,
            )
            .await
            .expect("sme step");
        review
    }

    pub async fn approved(&self, material_number: i64) -> Review {
        let mut review = self.pending_decision(material_number).await;
        self.orchestrator
            .submit_step(
                &mut review,
                StepName::FinalDecision,
                fields(json!({ "final_decision": "approve_scrap" })),
                self.approver,
            )
            .await
            .expect("final decision step");
        review
    }
}
