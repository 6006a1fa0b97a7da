use material_review_core::state_machine::states::{is_terminal, metadata, step_for};
use material_review_core::state_machine::{ReviewState, ReviewStateMachine, StepName};

#[test]
fn test_registry_covers_every_state() {
    let expected = [
        ("draft", StepName::GeneralInfo, false),
        ("pending_assignment", StepName::Assignment, false),
        ("pending_sme", StepName::SmeInvestigation, false),
        ("pending_decision", StepName::FinalDecision, false),
        ("approved", StepName::FinalDecision, true),
        ("rejected", StepName::FinalDecision, true),
        ("cancelled", StepName::GeneralInfo, true),
    ];

    for (status, step, terminal) in expected {
        let meta = metadata(status).expect("registered state");
        assert_eq!(meta.step, step, "{status}");
        assert_eq!(meta.terminal, terminal, "{status}");
        assert!(!meta.description.is_empty());
        assert_eq!(step_for(status), step);
        assert_eq!(is_terminal(status), terminal);
    }
}

#[test]
fn test_unknown_status_fails_safe() {
    for status in ["on_hold", "", "APPROVED", "pending"] {
        assert!(metadata(status).is_none());
        assert!(!is_terminal(status));
        assert_eq!(step_for(status), StepName::GeneralInfo);
        assert!(ReviewStateMachine::can_edit(status));
    }
}

#[test]
fn test_status_strings_round_trip() {
    for state in ReviewState::ALL {
        assert_eq!(state.as_str().parse::<ReviewState>(), Ok(state));
        assert_eq!(state.to_string(), state.as_str());
    }
    assert!("archived".parse::<ReviewState>().is_err());
}

#[test]
fn test_can_edit_is_not_terminal() {
    for state in ReviewState::ALL {
        assert_eq!(ReviewStateMachine::can_edit(state.as_str()), !state.is_terminal());
    }
}
