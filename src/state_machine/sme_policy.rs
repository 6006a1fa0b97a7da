//! # SME Requirement Policy
//!
//! Decides whether a proposed disposition action needs subject-matter expert
//! review before the approver decides.
//!
//! Resolution order:
//!
//! 1. No proposed action (absent or empty): not required.
//! 2. A configuration entry for the action exists: its `requires_sme` flag wins.
//! 3. Otherwise the configured [`SmeFallback`] decides.
//!
//! Two fallbacks have existed for step 3: an allow-list of actions that need
//! SME review, and "always required". Neither is implied; the fallback is an
//! explicit setting (`workflow.sme_fallback`) defaulting to
//! [`SmeFallback::AlwaysRequired`].

use crate::constants::PROPOSED_ACTION_CONFIG_KEY;
use crate::models::FieldUpdates;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lookup-option configuration attached to a proposed action value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionConfig {
    #[serde(default)]
    pub requires_sme: bool,

    /// Any other keys carried by the lookup option
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActionConfig {
    pub fn requiring_sme(requires_sme: bool) -> Self {
        Self {
            requires_sme,
            extra: Map::new(),
        }
    }

    /// Read the configuration a caller attached to a transition payload.
    ///
    /// Missing, `null` or malformed entries count as "no configuration".
    pub fn from_payload(data: &FieldUpdates) -> Option<Self> {
        match data.get(PROPOSED_ACTION_CONFIG_KEY)? {
            Value::Object(map) => {
                match serde_json::from_value(Value::Object(map.clone())) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::debug!(error = %e, "Ignoring malformed proposed action config");
                        None
                    }
                }
            }
            _ => None,
        }
    }

    /// Attach this configuration to a transition payload
    pub fn attach_to(&self, data: &mut FieldUpdates) {
        if let Ok(value) = serde_json::to_value(self) {
            data.insert(PROPOSED_ACTION_CONFIG_KEY.to_string(), value);
        }
    }
}

/// Behavior when no configuration entry exists for a proposed action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SmeFallback {
    /// Every non-empty proposed action requires SME review
    AlwaysRequired,
    /// Only the listed proposed actions require SME review
    AllowList { actions: Vec<String> },
}

impl Default for SmeFallback {
    fn default() -> Self {
        Self::AlwaysRequired
    }
}

/// SME requirement policy with an explicit fallback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SmeRequirementPolicy {
    fallback: SmeFallback,
}

impl SmeRequirementPolicy {
    pub fn new(fallback: SmeFallback) -> Self {
        Self { fallback }
    }

    pub fn fallback(&self) -> &SmeFallback {
        &self.fallback
    }

    pub fn is_sme_required(&self, proposed_action: Option<&str>, config: Option<&ActionConfig>) -> bool {
        let Some(action) = proposed_action.filter(|action| !action.is_empty()) else {
            return false;
        };

        if let Some(config) = config {
            return config.requires_sme;
        }

        match &self.fallback {
            SmeFallback::AlwaysRequired => true,
            SmeFallback::AllowList { actions } => actions.iter().any(|listed| listed == action),
        }
    }
}

/// SME requirement under the default fallback
pub fn is_sme_required(proposed_action: Option<&str>, config: Option<&ActionConfig>) -> bool {
    SmeRequirementPolicy::default().is_sme_required(proposed_action, config)
}
