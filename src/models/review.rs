//! # Review Model
//!
//! The central workflow entity: one disposition review of one material.
//!
//! ## Overview
//!
//! A `Review` is handed to the core as an in-memory record, mutated by the
//! step orchestrator, and handed back to the caller for committing. The
//! persisted `status` is kept as a raw string so rows written by an older or
//! newer schema still load; every status lookup goes through the state
//! registry, which treats unknown values leniently.
//!
//! ## Field Groups
//!
//! - **Initiator**: reason, proposed action, proposed quantities, justification
//! - **SME**: recommendation, recommended quantities, analysis, risk assessment
//! - **Approver**: follow-up scheduling, final decision, final quantities, notes
//!
//! Which group may be written, and by whom, is decided by
//! [`crate::access::FieldAccessPolicy`]. `status`, `completed_checklist` and
//! `is_superseded` are never writable through [`Review::apply_updates`].

use crate::error::{Result, ReviewWorkflowError};
use crate::state_machine::states::{self, ReviewState, StepName};
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Submitted field values keyed by field name, as received from a step form.
pub type FieldUpdates = serde_json::Map<String, Value>;

/// Material disposition review record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub review_id: i64,
    pub material_number: i64,
    pub initiated_by: Uuid,
    pub status: String,
    pub completed_checklist: bool,
    pub is_superseded: bool,

    // Initiator fields
    pub review_reason: Option<String>,
    pub months_no_movement: Option<i32>,
    pub proposed_action: Option<String>,
    pub proposed_safety_stock_qty: Option<f64>,
    pub proposed_unrestricted_qty: Option<f64>,
    pub business_justification: Option<String>,

    // SME investigation fields
    pub sme_recommendation: Option<String>,
    pub sme_recommended_safety_stock_qty: Option<f64>,
    pub sme_recommended_unrestricted_qty: Option<f64>,
    pub sme_analysis: Option<String>,
    pub alternative_applications: Option<String>,
    pub risk_assessment: Option<String>,

    // Follow-up fields
    pub requires_follow_up: Option<bool>,
    pub next_review_date: Option<NaiveDate>,
    pub follow_up_reason: Option<String>,
    pub review_frequency_weeks: Option<i32>,

    // Final decision fields
    pub final_decision: Option<String>,
    pub final_safety_stock_qty: Option<f64>,
    pub final_unrestricted_qty: Option<f64>,
    pub final_notes: Option<String>,
    pub estimated_savings: Option<f64>,
    pub implementation_date: Option<NaiveDate>,

    /// Who reached the final decision and when; set once on approval or rejection
    pub decided_by: Option<Uuid>,
    pub decided_at: Option<DateTime<Utc>>,

    pub previous_review_id: Option<i64>,
    pub last_updated_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assigns every listed column from the update map when its name matches.
/// Evaluates to `true` when the name is a known column.
macro_rules! assign_columns {
    ($target:ident, $name:expr, $value:expr, [$($column:ident),* $(,)?]) => {
        match $name {
            $(
                stringify!($column) => {
                    $target.$column = decode_field($name, $value)?;
                    true
                }
            )*
            _ => false,
        }
    };
}

pub(crate) use assign_columns;

/// Decode one submitted value into the column's type.
pub(crate) fn decode_field<T: DeserializeOwned>(name: &str, value: &Value) -> Result<T> {
    serde_json::from_value(value.clone()).map_err(|e| {
        ReviewWorkflowError::Validation(format!("Invalid value for field '{name}': {e}"))
    })
}

impl Review {
    /// Create a new draft review for a material
    pub fn new_draft(review_id: i64, material_number: i64, initiated_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            review_id,
            material_number,
            initiated_by,
            status: ReviewState::Draft.to_string(),
            completed_checklist: false,
            is_superseded: false,
            review_reason: None,
            months_no_movement: None,
            proposed_action: None,
            proposed_safety_stock_qty: None,
            proposed_unrestricted_qty: None,
            business_justification: None,
            sme_recommendation: None,
            sme_recommended_safety_stock_qty: None,
            sme_recommended_unrestricted_qty: None,
            sme_analysis: None,
            alternative_applications: None,
            risk_assessment: None,
            requires_follow_up: None,
            next_review_date: None,
            follow_up_reason: None,
            review_frequency_weeks: None,
            final_decision: None,
            final_safety_stock_qty: None,
            final_unrestricted_qty: None,
            final_notes: None,
            estimated_savings: None,
            implementation_date: None,
            decided_by: None,
            decided_at: None,
            previous_review_id: None,
            last_updated_by: Some(initiated_by),
            created_at: now,
            updated_at: now,
        }
    }

    /// Parsed workflow state, `None` for statuses this build does not know
    pub fn state(&self) -> Option<ReviewState> {
        self.status.parse().ok()
    }

    pub fn is_terminal(&self) -> bool {
        states::is_terminal(&self.status)
    }

    pub fn current_step(&self) -> StepName {
        states::step_for(&self.status)
    }

    /// Apply a partial update.
    ///
    /// All values are decoded into a copy first, so a bad value leaves `self`
    /// untouched. Names that are not review columns are skipped; callers are
    /// expected to have run the field access policy, which rejects them.
    pub fn apply_updates(&mut self, updates: &FieldUpdates) -> Result<()> {
        let mut staged = self.clone();
        for (name, value) in updates {
            staged.assign_field(name, value)?;
        }
        *self = staged;
        Ok(())
    }

    fn assign_field(&mut self, name: &str, value: &Value) -> Result<bool> {
        let review = self;
        let known = assign_columns!(
            review,
            name,
            value,
            [
                review_reason,
                months_no_movement,
                proposed_action,
                proposed_safety_stock_qty,
                proposed_unrestricted_qty,
                business_justification,
                sme_recommendation,
                sme_recommended_safety_stock_qty,
                sme_recommended_unrestricted_qty,
                sme_analysis,
                alternative_applications,
                risk_assessment,
                requires_follow_up,
                next_review_date,
                follow_up_reason,
                review_frequency_weeks,
                final_decision,
                final_safety_stock_qty,
                final_unrestricted_qty,
                final_notes,
                estimated_savings,
                implementation_date,
                previous_review_id,
            ]
        );
        Ok(known)
    }

    /// Stamp the final decision. An existing stamp is kept.
    pub fn record_decision(&mut self, decided_by: Uuid, decided_at: DateTime<Utc>) {
        if self.decided_by.is_none() {
            self.decided_by = Some(decided_by);
        }
        if self.decided_at.is_none() {
            self.decided_at = Some(decided_at);
        }
    }

    /// Drop follow-up scheduling once the approver says none is needed
    pub fn clear_follow_up_schedule(&mut self) {
        self.next_review_date = None;
        self.follow_up_reason = None;
        self.review_frequency_weeks = None;
    }
}
