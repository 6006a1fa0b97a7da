#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Material Review Core
//!
//! Workflow engine for material disposition reviews: a status state machine,
//! field-level access control and the orchestration that ties step
//! submissions to status changes and their side effects.
//!
//! ## Overview
//!
//! A review moves through
//! `draft → pending_assignment → pending_sme → pending_decision → approved | rejected`,
//! with `cancelled` reachable from any non-terminal status. SME review is
//! skipped when the proposed action does not require it.
//!
//! ## Module Organization
//!
//! - [`state_machine`] - State registry, transition table, evaluator and post-transition actions
//! - [`access`] - Status-based field locking and role-based field restrictions
//! - [`orchestration`] - Step completion, assignment, creation and cancellation
//! - [`models`] - Review, assignment and checklist records
//! - [`services`] - Collaborator traits and in-memory implementations
//! - [`events`] - Status-change notification fan-out
//! - [`config`] - Layered configuration
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use material_review_core::config::ReviewWorkflowConfig;
//! use material_review_core::models::Review;
//! use material_review_core::state_machine::{ReviewAction, ReviewStateMachine};
//! use uuid::Uuid;
//!
//! let config = ReviewWorkflowConfig::default();
//! let machine = ReviewStateMachine::from_settings(&config.workflow);
//!
//! let mut review = Review::new_draft(1, 100_200, Uuid::new_v4());
//! review.completed_checklist = true;
//!
//! let next = machine.next_status(&review.status, ReviewAction::CompleteChecklist, &review, &Default::default());
//! assert_eq!(next.map(|s| s.as_str()), Some("pending_assignment"));
//! ```
//!
//! ## Persistence
//!
//! The core never commits anything itself except through the
//! [`services::ReviewStore`] it is given. Callers must serialize writes per
//! review (row lock or optimistic version check); the state machine does not.

pub mod access;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod services;
pub mod state_machine;

pub use access::{AccessError, FieldAccessPolicy, UserRole};
pub use config::{ConfigManager, ReviewWorkflowConfig};
pub use error::{Result, ReviewWorkflowError};
pub use models::{Assignment, AssignmentRole, AssignmentStatus, FieldUpdates, Review};
pub use orchestration::{ReviewServices, StepCompletionOrchestrator, StepOutcome};
pub use state_machine::{ReviewAction, ReviewState, ReviewStateMachine, StepName};
