pub mod assignment;
pub mod checklist;
pub mod review;

// Re-export core models for easy access
pub use assignment::{Assignment, AssignmentRole, AssignmentStatus};
pub use checklist::{ChecklistSubmission, ReviewChecklist, CHECKLIST_FIELDS, REQUIRED_CHECKLIST_FIELDS};
pub use review::{FieldUpdates, Review};
