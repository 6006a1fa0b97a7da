//! # Transition Context
//!
//! Data handed to guards and target resolvers, and the record of a status
//! change handed to post-transition actions.
//!
//! `TransitionContext` borrows everything: evaluation is a pure function of
//! the review, the submitted payload and the SME policy. `StatusTransition`
//! owns its data so it can outlive the mutation that produced it and be
//! replayed by the caller after committing.

use super::events::ReviewAction;
use super::sme_policy::SmeRequirementPolicy;
use super::states::ReviewState;
use crate::models::{FieldUpdates, Review};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Inputs visible to guards and target resolvers
#[derive(Debug, Clone, Copy)]
pub struct TransitionContext<'a> {
    pub review: &'a Review,
    pub data: &'a FieldUpdates,
    pub sme_policy: &'a SmeRequirementPolicy,
}

impl<'a> TransitionContext<'a> {
    pub fn new(
        review: &'a Review,
        data: &'a FieldUpdates,
        sme_policy: &'a SmeRequirementPolicy,
    ) -> Self {
        Self {
            review,
            data,
            sme_policy,
        }
    }
}

/// A status change that has been applied to a review in memory.
///
/// Side effects run from this record once the caller has persisted the review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub review_id: i64,
    pub material_number: i64,
    pub from_status: String,
    pub to_state: ReviewState,
    pub action: ReviewAction,
    pub changed_by: Uuid,
    pub changed_at: DateTime<Utc>,
}

impl StatusTransition {
    pub fn new(review: &Review, from_status: impl Into<String>, to_state: ReviewState, action: ReviewAction, changed_by: Uuid) -> Self {
        Self {
            review_id: review.review_id,
            material_number: review.material_number,
            from_status: from_status.into(),
            to_state,
            action,
            changed_by,
            changed_at: Utc::now(),
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.to_state.is_terminal()
    }
}
