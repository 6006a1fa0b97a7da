use super::context::TransitionContext;
use crate::constants::REJECT_DECISION;
use serde_json::Value;
use std::fmt;

/// Predicate attached to a transition rule.
///
/// Guards are plain functions of the transition context so the rule table
/// can be a `const`. A failing guard means "no transition", never an error.
#[derive(Clone, Copy)]
pub struct StateGuard {
    description: &'static str,
    check: fn(&TransitionContext<'_>) -> bool,
}

impl StateGuard {
    pub const fn new(description: &'static str, check: fn(&TransitionContext<'_>) -> bool) -> Self {
        Self { description, check }
    }

    /// Check if a transition is allowed
    pub fn check(&self, ctx: &TransitionContext<'_>) -> bool {
        (self.check)(ctx)
    }

    /// Get a description of this guard for logging
    pub fn description(&self) -> &'static str {
        self.description
    }
}

impl fmt::Debug for StateGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateGuard")
            .field("description", &self.description)
            .finish()
    }
}

/// The review's checklist flag must already be set
pub const CHECKLIST_COMPLETED: StateGuard =
    StateGuard::new("Checklist must be marked complete", checklist_completed);

/// The SME submission must carry a recommendation
pub const SME_RECOMMENDATION_PRESENT: StateGuard = StateGuard::new(
    "SME recommendation must be provided",
    sme_recommendation_present,
);

/// A final decision other than the reject sentinel
pub const APPROVAL_DECISION: StateGuard = StateGuard::new(
    "Final decision must be present and not a rejection",
    approval_decision,
);

/// A final decision equal to the reject sentinel
pub const REJECTION_DECISION: StateGuard =
    StateGuard::new("Final decision must be a rejection", rejection_decision);

fn checklist_completed(ctx: &TransitionContext<'_>) -> bool {
    ctx.review.completed_checklist
}

fn sme_recommendation_present(ctx: &TransitionContext<'_>) -> bool {
    present(ctx.data.get("sme_recommendation"))
}

fn approval_decision(ctx: &TransitionContext<'_>) -> bool {
    match ctx.data.get("final_decision") {
        Some(Value::String(decision)) => decision != REJECT_DECISION,
        other => present(other),
    }
}

fn rejection_decision(ctx: &TransitionContext<'_>) -> bool {
    matches!(ctx.data.get("final_decision"), Some(Value::String(decision)) if decision == REJECT_DECISION)
}

fn present(value: Option<&Value>) -> bool {
    !matches!(value, None | Some(Value::Null))
}
