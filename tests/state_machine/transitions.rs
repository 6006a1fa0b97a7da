use material_review_core::models::{FieldUpdates, Review};
use material_review_core::state_machine::{
    ActionConfig, ReviewAction, ReviewState, ReviewStateMachine, SourceState, TRANSITIONS,
};
use serde_json::json;
use uuid::Uuid;

fn review_at(state: ReviewState) -> Review {
    let mut review = Review::new_draft(11, 3300, Uuid::new_v4());
    review.status = state.to_string();
    review
}

fn data(value: serde_json::Value) -> FieldUpdates {
    value.as_object().cloned().unwrap()
}

#[test]
fn test_table_has_one_wildcard_rule_for_cancel() {
    let wildcards: Vec<_> = TRANSITIONS
        .iter()
        .filter(|rule| rule.from == SourceState::AnyNonTerminal)
        .collect();
    assert_eq!(wildcards.len(), 1);
    assert_eq!(wildcards[0].action, ReviewAction::Cancel);
    assert!(wildcards[0].guard.is_none());
}

#[test]
fn test_checklist_requires_flag_at_evaluation_time() {
    let machine = ReviewStateMachine::default();
    let mut review = review_at(ReviewState::Draft);

    assert_eq!(
        machine.next_status("draft", ReviewAction::CompleteChecklist, &review, &FieldUpdates::new()),
        None
    );

    review.completed_checklist = true;
    assert_eq!(
        machine.next_status("draft", ReviewAction::CompleteChecklist, &review, &FieldUpdates::new()),
        Some(ReviewState::PendingAssignment)
    );
}

#[test]
fn test_assign_routes_on_sme_requirement() {
    let machine = ReviewStateMachine::default();
    let mut review = review_at(ReviewState::PendingAssignment);

    review.proposed_action = Some("scrap".to_string());
    assert_eq!(
        machine.next_status("pending_assignment", ReviewAction::Assign, &review, &FieldUpdates::new()),
        Some(ReviewState::PendingSme)
    );

    review.proposed_action = None;
    assert_eq!(
        machine.next_status("pending_assignment", ReviewAction::Assign, &review, &FieldUpdates::new()),
        Some(ReviewState::PendingDecision)
    );

    review.proposed_action = Some("scrap".to_string());
    let mut payload = FieldUpdates::new();
    ActionConfig::requiring_sme(false).attach_to(&mut payload);
    assert_eq!(
        machine.next_status("pending_assignment", ReviewAction::Assign, &review, &payload),
        Some(ReviewState::PendingDecision)
    );
}

#[test]
fn test_sme_submission_needs_recommendation() {
    let machine = ReviewStateMachine::default();
    let review = review_at(ReviewState::PendingSme);

    assert_eq!(
        machine.next_status(
            "pending_sme",
            ReviewAction::SubmitSmeReview,
            &review,
            &data(json!({ "sme_analysis": "partial notes" }))
        ),
        None
    );
    assert_eq!(
        machine.next_status(
            "pending_sme",
            ReviewAction::SubmitSmeReview,
            &review,
            &data(json!({ "sme_recommendation": "keep" }))
        ),
        Some(ReviewState::PendingDecision)
    );
}

#[test]
fn test_decision_actions_match_literal() {
    let machine = ReviewStateMachine::default();
    let review = review_at(ReviewState::PendingDecision);
    let reject = data(json!({ "final_decision": "reject" }));
    let approve = data(json!({ "final_decision": "approve_partial" }));

    assert_eq!(
        machine.next_status("pending_decision", ReviewAction::Reject, &review, &reject),
        Some(ReviewState::Rejected)
    );
    assert_eq!(
        machine.next_status("pending_decision", ReviewAction::Approve, &review, &reject),
        None
    );
    assert_eq!(
        machine.next_status("pending_decision", ReviewAction::Approve, &review, &approve),
        Some(ReviewState::Approved)
    );
    assert_eq!(
        machine.next_status("pending_decision", ReviewAction::Reject, &review, &approve),
        None
    );
}

#[test]
fn test_cancel_from_every_non_terminal_state() {
    let machine = ReviewStateMachine::default();
    for state in ReviewState::ALL.into_iter().filter(|s| !s.is_terminal()) {
        let review = review_at(state);
        assert_eq!(
            machine.next_status(state.as_str(), ReviewAction::Cancel, &review, &FieldUpdates::new()),
            Some(ReviewState::Cancelled),
            "{state}"
        );
    }
}

#[test]
fn test_valid_actions_per_state() {
    assert_eq!(
        ReviewStateMachine::valid_actions("draft"),
        vec![ReviewAction::CompleteChecklist, ReviewAction::Cancel]
    );
    assert_eq!(
        ReviewStateMachine::valid_actions("pending_sme"),
        vec![ReviewAction::SubmitSmeReview, ReviewAction::Cancel]
    );
    assert!(ReviewStateMachine::valid_actions("approved").is_empty());
}
