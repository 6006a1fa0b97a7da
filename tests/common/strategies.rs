use material_review_core::models::{FieldUpdates, Review};
use material_review_core::state_machine::{ReviewAction, ReviewState};
use proptest::prelude::*;
use proptest::strategy::Just;
use serde_json::{json, Value};
use uuid::Uuid;

pub fn state_strategy() -> impl Strategy<Value = ReviewState> {
    prop::sample::select(ReviewState::ALL.to_vec())
}

pub fn terminal_state_strategy() -> impl Strategy<Value = ReviewState> {
    prop::sample::select(vec![
        ReviewState::Approved,
        ReviewState::Rejected,
        ReviewState::Cancelled,
    ])
}

pub fn action_strategy() -> impl Strategy<Value = ReviewAction> {
    prop::sample::select(ReviewAction::ALL.to_vec())
}

/// Proposed action values, including absent and empty
pub fn proposed_action_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[a-z_]{1,16}".prop_map(Some),
    ]
}

/// Values a caller might submit as `final_decision`
pub fn decision_value_strategy() -> impl Strategy<Value = Option<Value>> {
    prop_oneof![
        Just(None),
        Just(Some(Value::Null)),
        Just(Some(json!("reject"))),
        Just(Some(json!("approve"))),
        "[a-z_]{1,12}".prop_map(|s| Some(Value::String(s))),
    ]
}

/// Payloads mixing decision and recommendation keys
pub fn payload_strategy() -> impl Strategy<Value = FieldUpdates> {
    (decision_value_strategy(), prop::option::of(prop::option::of("[a-z]{1,8}"))).prop_map(
        |(decision, recommendation)| {
            let mut data = FieldUpdates::new();
            if let Some(decision) = decision {
                data.insert("final_decision".to_string(), decision);
            }
            if let Some(recommendation) = recommendation {
                data.insert(
                    "sme_recommendation".to_string(),
                    recommendation.map(Value::String).unwrap_or(Value::Null),
                );
            }
            data
        },
    )
}

/// Review at `state` with arbitrary checklist flag and proposed action
pub fn review_strategy() -> impl Strategy<Value = Review> {
    (state_strategy(), any::<bool>(), proposed_action_strategy()).prop_map(
        |(state, completed_checklist, proposed_action)| {
            let mut review = Review::new_draft(1, 1000, Uuid::nil());
            review.status = state.to_string();
            review.completed_checklist = completed_checklist;
            review.proposed_action = proposed_action;
            review
        },
    )
}
