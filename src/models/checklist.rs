//! Checklist record kept alongside a review.
//!
//! Checklist answers arrive with the `checklist` step but are stored as their
//! own record, one per review, created on first submission and updated in
//! place afterwards.

use super::review::{assign_columns, decode_field, FieldUpdates};
use crate::error::{Result, ReviewWorkflowError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Every field that belongs to the checklist record
pub const CHECKLIST_FIELDS: [&str; 11] = [
    "has_open_orders",
    "has_forecast_demand",
    "checked_alternate_plants",
    "contacted_procurement",
    "reviewed_bom_usage",
    "checked_supersession",
    "checked_historical_usage",
    "open_order_numbers",
    "forecast_next_12m",
    "alternate_plant_qty",
    "procurement_feedback",
];

/// Yes/no answers that must all be present to complete the checklist step
pub const REQUIRED_CHECKLIST_FIELDS: [&str; 7] = [
    "has_open_orders",
    "has_forecast_demand",
    "checked_alternate_plants",
    "contacted_procurement",
    "reviewed_bom_usage",
    "checked_supersession",
    "checked_historical_usage",
];

/// Checklist fields split off a step submission
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistSubmission {
    fields: FieldUpdates,
}

impl ChecklistSubmission {
    /// Split checklist fields out of `updates`.
    ///
    /// Returns the submission and the remaining (non-checklist) updates, or a
    /// validation error naming every missing required answer.
    pub fn split_from(updates: &FieldUpdates) -> Result<(Self, FieldUpdates)> {
        let mut fields = FieldUpdates::new();
        let mut remaining = FieldUpdates::new();
        for (name, value) in updates {
            if CHECKLIST_FIELDS.contains(&name.as_str()) {
                fields.insert(name.clone(), value.clone());
            } else {
                remaining.insert(name.clone(), value.clone());
            }
        }

        let missing: Vec<&str> = REQUIRED_CHECKLIST_FIELDS
            .iter()
            .copied()
            .filter(|name| !fields.contains_key(*name))
            .collect();
        if !missing.is_empty() {
            let provided: Vec<&str> = fields.keys().map(String::as_str).collect();
            return Err(ReviewWorkflowError::Validation(format!(
                "Checklist step requires all boolean fields: {missing:?}. You provided: {provided:?}"
            )));
        }

        Ok((Self { fields }, remaining))
    }

    pub fn fields(&self) -> &FieldUpdates {
        &self.fields
    }
}

/// Stored checklist answers for one review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewChecklist {
    pub review_id: i64,
    pub has_open_orders: bool,
    pub has_forecast_demand: bool,
    pub checked_alternate_plants: bool,
    pub contacted_procurement: bool,
    pub reviewed_bom_usage: bool,
    pub checked_supersession: bool,
    pub checked_historical_usage: bool,
    pub open_order_numbers: Option<String>,
    pub forecast_next_12m: Option<f64>,
    pub alternate_plant_qty: Option<f64>,
    pub procurement_feedback: Option<String>,
    pub created_by: Uuid,
    pub last_updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReviewChecklist {
    /// Build the first checklist record for a review
    pub fn create(review_id: i64, submission: &ChecklistSubmission, by: Uuid) -> Result<Self> {
        let now = Utc::now();
        let mut checklist = Self {
            review_id,
            has_open_orders: false,
            has_forecast_demand: false,
            checked_alternate_plants: false,
            contacted_procurement: false,
            reviewed_bom_usage: false,
            checked_supersession: false,
            checked_historical_usage: false,
            open_order_numbers: None,
            forecast_next_12m: None,
            alternate_plant_qty: None,
            procurement_feedback: None,
            created_by: by,
            last_updated_by: by,
            created_at: now,
            updated_at: now,
        };
        checklist.apply(submission, by)?;
        Ok(checklist)
    }

    /// Overwrite the submitted answers; fields not in the submission keep their value
    pub fn apply(&mut self, submission: &ChecklistSubmission, by: Uuid) -> Result<()> {
        let mut staged = self.clone();
        for (name, value) in submission.fields() {
            let checklist = &mut staged;
            assign_columns!(
                checklist,
                name.as_str(),
                value,
                [
                    has_open_orders,
                    has_forecast_demand,
                    checked_alternate_plants,
                    contacted_procurement,
                    reviewed_bom_usage,
                    checked_supersession,
                    checked_historical_usage,
                    open_order_numbers,
                    forecast_next_12m,
                    alternate_plant_qty,
                    procurement_feedback,
                ]
            );
        }
        staged.last_updated_by = by;
        staged.updated_at = Utc::now();
        *self = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_answers() -> FieldUpdates {
        json!({
            "has_open_orders": false,
            "has_forecast_demand": false,
            "checked_alternate_plants": true,
            "contacted_procurement": true,
            "reviewed_bom_usage": true,
            "checked_supersession": true,
            "checked_historical_usage": true,
            "procurement_feedback": "No objections",
            "review_reason": "Slow mover",
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_split_separates_checklist_fields() {
        let (submission, remaining) = ChecklistSubmission::split_from(&complete_answers()).unwrap();
        assert_eq!(submission.fields().len(), 8);
        assert_eq!(remaining.len(), 1);
        assert!(remaining.contains_key("review_reason"));
    }

    #[test]
    fn test_missing_required_answers_are_named() {
        let mut answers = complete_answers();
        answers.remove("reviewed_bom_usage");
        answers.remove("has_open_orders");

        let err = ChecklistSubmission::split_from(&answers).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("has_open_orders"));
        assert!(message.contains("reviewed_bom_usage"));
    }

    #[test]
    fn test_apply_preserves_unsubmitted_optional_answers() {
        let by = Uuid::new_v4();
        let (first, _) = ChecklistSubmission::split_from(&complete_answers()).unwrap();
        let mut checklist = ReviewChecklist::create(9, &first, by).unwrap();
        assert_eq!(checklist.procurement_feedback.as_deref(), Some("No objections"));
        assert!(checklist.checked_supersession);

        let mut second_answers = complete_answers();
        second_answers.remove("procurement_feedback");
        second_answers.insert("has_open_orders".to_string(), json!(true));
        let (second, _) = ChecklistSubmission::split_from(&second_answers).unwrap();
        checklist.apply(&second, by).unwrap();

        assert!(checklist.has_open_orders);
        assert_eq!(checklist.procurement_feedback.as_deref(), Some("No objections"));
    }
}
