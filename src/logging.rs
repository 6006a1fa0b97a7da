//! # Structured Logging Module
//!
//! Environment-aware structured logging for the review workflow. Console
//! output is human-readable by default and JSON when `logging.json` is set
//! or, for [`init_structured_logging`], when running in production.

use crate::config::LoggingSettings;
use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};
use uuid::Uuid;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific defaults
pub fn init_structured_logging() {
    init_logging_with(&default_settings(&get_environment()));
}

/// Level by environment; JSON output in production
fn default_settings(environment: &str) -> LoggingSettings {
    LoggingSettings {
        level: Some(get_log_level(environment).to_string()),
        json: environment == "production",
    }
}

/// Initialize structured logging from configuration. Only the first call has effect.
pub fn init_logging_with(settings: &LoggingSettings) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let level = settings
            .level
            .clone()
            .unwrap_or_else(|| get_log_level(&environment).to_string());

        // RUST_LOG wins over configuration when present
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

        let layer = if settings.json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // A host may already have installed a global subscriber
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            environment = %environment,
            level = %level,
            json = settings.json,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("REVIEW_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log a committed review status change
pub fn log_review_transition(
    review_id: i64,
    from_status: &str,
    to_status: &str,
    action: &str,
    changed_by: Uuid,
) {
    tracing::info!(
        review_id = review_id,
        from_status = %from_status,
        to_status = %to_status,
        action = %action,
        changed_by = %changed_by,
        timestamp = %Utc::now().to_rfc3339(),
        "REVIEW_TRANSITION"
    );
}

/// Log a rejected field update
pub fn log_access_denied(review_id: i64, user_id: Uuid, status: &str, gate: &str, fields: &[String]) {
    tracing::warn!(
        review_id = review_id,
        user_id = %user_id,
        status = %status,
        gate = %gate,
        fields = ?fields,
        timestamp = %Utc::now().to_rfc3339(),
        "REVIEW_ACCESS_DENIED"
    );
}

/// Log structured data for review operations
pub fn log_review_operation(operation: &str, review_id: Option<i64>, material_number: Option<i64>, status: &str, details: Option<&str>) {
    tracing::info!(
        operation = %operation,
        review_id = review_id,
        material_number = material_number,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "REVIEW_OPERATION"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_logs_at_info() {
        assert_eq!(get_log_level("production"), "info");
        assert_eq!(get_log_level("test"), "debug");
        assert_eq!(get_log_level("anything"), "debug");
    }

    #[test]
    fn test_production_defaults_to_json() {
        let production = default_settings("production");
        assert!(production.json);
        assert_eq!(production.level.as_deref(), Some("info"));

        let development = default_settings("development");
        assert!(!development.json);
        assert_eq!(development.level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_init_is_idempotent() {
        init_logging_with(&LoggingSettings::default());
        init_structured_logging();
        log_review_operation("create", Some(1), Some(2), "draft", None);
    }
}
