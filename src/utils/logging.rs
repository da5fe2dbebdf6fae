//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the LinguaDesk client.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::models::{LessonStatus, Role};
use crate::utils::errors::{LinguaDeskError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must be held
/// for the lifetime of the process.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.directory, &config.file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(non_blocking).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking).boxed()
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(file_layer)
        .try_init()
        .map_err(|e| LinguaDeskError::Config(format!("Failed to initialize logging: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log user actions with structured data
pub fn log_user_action(user_id: i64, action: &str, details: Option<&str>) {
    info!(
        user_id = user_id,
        action = action,
        details = details,
        "User action performed"
    );
}

/// Log authentication events
pub fn log_auth_event(email: &str, event: &str, role: Option<Role>) {
    info!(
        email = email,
        event = event,
        role = role.map(|r| r.as_str()),
        "Authentication event"
    );
}

/// Log an automatic lesson status transition
pub fn log_lesson_transition(lesson_id: i64, from: LessonStatus, to: LessonStatus, rule: &str, applied: bool) {
    if applied {
        info!(
            lesson_id = lesson_id,
            from = %from,
            to = %to,
            rule = rule,
            "Lesson status transition applied"
        );
    } else {
        warn!(
            lesson_id = lesson_id,
            from = %from,
            to = %to,
            rule = rule,
            "Lesson status transition failed, will retry on next poll"
        );
    }
}

/// Log API errors with context
pub fn log_api_error(endpoint: &str, error: &str, context: Option<&str>) {
    error!(
        endpoint = endpoint,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log API request timing
pub fn log_api_request(method: &str, path: &str, status: u16, duration_ms: u64) {
    debug!(
        method = method,
        path = path,
        status = status,
        duration_ms = duration_ms,
        "API request completed"
    );
}
