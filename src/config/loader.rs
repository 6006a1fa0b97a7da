//! Configuration Loader
//!
//! Layers defaults, an optional TOML file and `REVIEW_WORKFLOW_` environment
//! variables, then validates the result.

use super::error::{ConfigResult, ConfigurationError};
use super::ReviewWorkflowConfig;
use config::{Config, Environment, File, FileFormat};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/review-workflow.toml";

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "REVIEW_WORKFLOW";

/// Comma-separated in the environment, e.g.
/// `REVIEW_WORKFLOW_WORKFLOW__SME_FALLBACK__ACTIONS=scrap,sell`
const SME_FALLBACK_ACTIONS_KEY: &str = "workflow.sme_fallback.actions";

/// Loaded, validated configuration
#[derive(Debug)]
pub struct ConfigManager {
    config: ReviewWorkflowConfig,
    source_file: Option<PathBuf>,
}

impl ConfigManager {
    /// Load from the default file (if present) and the process environment
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        let file = default_path.exists().then(|| default_path.to_path_buf());
        Self::build(file, None)
    }

    /// Load from an explicit file, which must exist, and the process environment
    pub fn load_from_path(path: impl AsRef<Path>) -> ConfigResult<Arc<ConfigManager>> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigurationError::config_file_not_found(path));
        }
        Self::build(Some(path.to_path_buf()), None)
    }

    /// Load with an explicit environment map instead of the process environment.
    /// This is useful for testing without modifying global environment variables.
    pub fn load_with_env(
        path: Option<&Path>,
        env: HashMap<String, String>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigurationError::config_file_not_found(path));
            }
        }
        Self::build(path.map(Path::to_path_buf), Some(env))
    }

    fn build(
        file: Option<PathBuf>,
        env: Option<HashMap<String, String>>,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&ReviewWorkflowConfig::default())?);

        if let Some(path) = &file {
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key(SME_FALLBACK_ACTIONS_KEY)
                .source(env),
        );

        let config: ReviewWorkflowConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        debug!(
            source_file = ?file,
            sme_fallback = ?config.workflow.sme_fallback,
            category = %config.workflow.action_config_category,
            action_configs = config.action_configs.len(),
            "Review workflow configuration loaded"
        );

        Ok(Arc::new(ConfigManager {
            config,
            source_file: file,
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &ReviewWorkflowConfig {
        &self.config
    }

    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }
}
