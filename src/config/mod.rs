//! # Review Workflow Configuration
//!
//! Layered configuration for the workflow core.
//!
//! ## Sources
//!
//! 1. Built-in defaults ([`ReviewWorkflowConfig::default`])
//! 2. `config/review-workflow.toml`, or an explicit file passed to the loader
//! 3. Environment variables prefixed `REVIEW_WORKFLOW_`, nested with `__`
//!    (for example `REVIEW_WORKFLOW_LOGGING__LEVEL=info`)
//!
//! ## Example
//!
//! ```toml
//! [workflow]
//! action_config_category = "proposed_action"
//!
//! [workflow.sme_fallback]
//! mode = "allow_list"
//! actions = ["scrap", "sell"]
//!
//! [action_configs.keep_no_change]
//! requires_sme = false
//!
//! [logging]
//! level = "info"
//! json = true
//! ```

pub mod error;
pub mod loader;

use crate::constants::DEFAULT_ACTION_CONFIG_CATEGORY;
use crate::state_machine::{ActionConfig, SmeFallback};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use error::{ConfigResult, ConfigurationError};
pub use loader::ConfigManager;

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReviewWorkflowConfig {
    pub workflow: WorkflowSettings,

    /// Lookup-option configuration for proposed actions, keyed by action value.
    /// Used when the host has no lookup-option store of its own.
    pub action_configs: HashMap<String, ActionConfig>,

    pub logging: LoggingSettings,
}

/// Workflow behavior settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkflowSettings {
    /// SME requirement when no configuration exists for a proposed action
    pub sme_fallback: SmeFallback,

    /// Lookup-option category holding proposed-action configuration
    pub action_config_category: String,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            sme_fallback: SmeFallback::AlwaysRequired,
            action_config_category: DEFAULT_ACTION_CONFIG_CATEGORY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive; environment default when unset
    pub level: Option<String>,
    pub json: bool,
}

impl ReviewWorkflowConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if self.workflow.action_config_category.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "workflow.action_config_category",
                &self.workflow.action_config_category,
                "category must not be empty",
            ));
        }

        if let SmeFallback::AllowList { actions } = &self.workflow.sme_fallback {
            if actions.is_empty() {
                return Err(ConfigurationError::invalid_value(
                    "workflow.sme_fallback.actions",
                    "[]",
                    "allow_list fallback needs at least one action; use always_required instead",
                ));
            }
            if actions.iter().any(|action| action.trim().is_empty()) {
                return Err(ConfigurationError::invalid_value(
                    "workflow.sme_fallback.actions",
                    format!("{actions:?}"),
                    "actions must not be blank",
                ));
            }
        }

        Ok(())
    }
}
