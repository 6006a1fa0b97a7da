//! # Transition Table
//!
//! The complete set of review status transitions as data.
//!
//! | From | Action | Guard | To |
//! |------|--------|-------|----|
//! | draft | complete_checklist | checklist completed | pending_assignment |
//! | pending_assignment | assign | - | pending_sme or pending_decision |
//! | pending_sme | submit_sme_review | SME recommendation present | pending_decision |
//! | pending_decision | approve | decision present, not reject | approved |
//! | pending_decision | reject | decision is reject | rejected |
//! | any non-terminal | cancel | - | cancelled |
//!
//! Rules are scanned in order and the first rule matching the source and
//! action decides; a failing guard on that rule means no transition.

use super::context::TransitionContext;
use super::events::ReviewAction;
use super::guards::{
    StateGuard, APPROVAL_DECISION, CHECKLIST_COMPLETED, REJECTION_DECISION,
    SME_RECOMMENDATION_PRESENT,
};
use super::sme_policy::ActionConfig;
use super::states::ReviewState;
use std::fmt;

/// Source side of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceState {
    /// Matches any status not registered as terminal, unknown statuses included
    AnyNonTerminal,
    Exact(ReviewState),
}

impl SourceState {
    /// `current` is `None` when the stored status is not a known state
    pub fn matches(&self, current: Option<ReviewState>) -> bool {
        match self {
            Self::AnyNonTerminal => !current.is_some_and(|state| state.is_terminal()),
            Self::Exact(state) => current == Some(*state),
        }
    }
}

/// Computes a target state from the transition context
pub type TargetResolver = fn(&TransitionContext<'_>) -> ReviewState;

/// Target side of a rule
#[derive(Clone, Copy)]
pub enum TransitionTarget {
    Fixed(ReviewState),
    Resolved(TargetResolver),
}

impl fmt::Debug for TransitionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(state) => f.debug_tuple("Fixed").field(state).finish(),
            Self::Resolved(_) => f.write_str("Resolved(..)"),
        }
    }
}

impl TransitionTarget {
    pub fn resolve(&self, ctx: &TransitionContext<'_>) -> ReviewState {
        match self {
            Self::Fixed(state) => *state,
            Self::Resolved(resolver) => resolver(ctx),
        }
    }
}

/// One row of the transition table
#[derive(Debug, Clone, Copy)]
pub struct TransitionRule {
    pub from: SourceState,
    pub action: ReviewAction,
    pub guard: Option<StateGuard>,
    pub to: TransitionTarget,
}

pub const TRANSITIONS: &[TransitionRule] = &[
    TransitionRule {
        from: SourceState::Exact(ReviewState::Draft),
        action: ReviewAction::CompleteChecklist,
        guard: Some(CHECKLIST_COMPLETED),
        to: TransitionTarget::Fixed(ReviewState::PendingAssignment),
    },
    TransitionRule {
        from: SourceState::Exact(ReviewState::PendingAssignment),
        action: ReviewAction::Assign,
        guard: None,
        to: TransitionTarget::Resolved(resolve_assignment_target),
    },
    TransitionRule {
        from: SourceState::Exact(ReviewState::PendingSme),
        action: ReviewAction::SubmitSmeReview,
        guard: Some(SME_RECOMMENDATION_PRESENT),
        to: TransitionTarget::Fixed(ReviewState::PendingDecision),
    },
    TransitionRule {
        from: SourceState::Exact(ReviewState::PendingDecision),
        action: ReviewAction::Approve,
        guard: Some(APPROVAL_DECISION),
        to: TransitionTarget::Fixed(ReviewState::Approved),
    },
    TransitionRule {
        from: SourceState::Exact(ReviewState::PendingDecision),
        action: ReviewAction::Reject,
        guard: Some(REJECTION_DECISION),
        to: TransitionTarget::Fixed(ReviewState::Rejected),
    },
    TransitionRule {
        from: SourceState::AnyNonTerminal,
        action: ReviewAction::Cancel,
        guard: None,
        to: TransitionTarget::Fixed(ReviewState::Cancelled),
    },
];

/// SME review when the proposed action needs it, otherwise straight to decision
fn resolve_assignment_target(ctx: &TransitionContext<'_>) -> ReviewState {
    let config = ActionConfig::from_payload(ctx.data);
    let sme_required = ctx
        .sme_policy
        .is_sme_required(ctx.review.proposed_action.as_deref(), config.as_ref());

    if sme_required {
        ReviewState::PendingSme
    } else {
        ReviewState::PendingDecision
    }
}

/// First rule matching the source state and action, if any
pub fn find_rule(current: Option<ReviewState>, action: ReviewAction) -> Option<&'static TransitionRule> {
    TRANSITIONS
        .iter()
        .find(|rule| rule.action == action && rule.from.matches(current))
}

/// Actions with at least one rule leaving `current`, ignoring guards
pub fn actions_from(current: Option<ReviewState>) -> Vec<ReviewAction> {
    let mut actions: Vec<ReviewAction> = Vec::new();
    for rule in TRANSITIONS {
        if rule.from.matches(current) && !actions.contains(&rule.action) {
            actions.push(rule.action);
        }
    }
    actions
}
