//! State Machine Tests Module
//!
//! Registry lookups, the transition table and the SME requirement policy,
//! exercised through the public API.

#[path = "state_machine/states.rs"]
pub mod states;
#[path = "state_machine/transitions.rs"]
pub mod transitions;
#[path = "state_machine/sme_policy.rs"]
pub mod sme_policy;
