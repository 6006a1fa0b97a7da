//! # Field Access Policy
//!
//! Who may write which review fields, and when.

pub mod assignee;
pub mod errors;
pub mod field_sets;
pub mod policy;
pub mod user_context;

pub use assignee::{step_assignee_role, validate_assignee};
pub use errors::AccessError;
pub use field_sets::{
    approver_restricted_fields, editable_fields_for_status, initiator_fields, sme_restricted_fields,
    FINAL_DECISION_FIELDS, FOLLOW_UP_FIELDS, GENERAL_INFO_FIELDS, SME_RESTRICTED_FIELDS,
};
pub use policy::FieldAccessPolicy;
pub use user_context::{user_context, UserReviewContext, UserRole};
