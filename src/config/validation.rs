//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{LinguaDeskError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_api_config(&settings.api)?;
    validate_scheduler_config(&settings.scheduler)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate credentials; only the daemon needs them, so this is separate
pub fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.email.is_empty() {
        return Err(LinguaDeskError::Config(
            "Login email is required".to_string()
        ));
    }

    if config.password.is_empty() {
        return Err(LinguaDeskError::Config(
            "Login password is required".to_string()
        ));
    }

    Ok(())
}

/// Validate API client configuration
fn validate_api_config(config: &super::ApiConfig) -> Result<()> {
    if config.base_url.is_empty() {
        return Err(LinguaDeskError::Config(
            "API base URL is required".to_string()
        ));
    }

    url::Url::parse(&config.base_url)
        .map_err(|e| LinguaDeskError::Config(format!("Invalid API base URL: {}", e)))?;

    if config.timeout_seconds == 0 {
        return Err(LinguaDeskError::Config(
            "API timeout must be greater than 0".to_string()
        ));
    }

    if config.requests_per_second == 0 {
        return Err(LinguaDeskError::Config(
            "Requests per second must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate lesson poller configuration
fn validate_scheduler_config(config: &super::SchedulerConfig) -> Result<()> {
    if config.poll_interval_seconds == 0 {
        return Err(LinguaDeskError::Config(
            "Poll interval must be greater than 0".to_string()
        ));
    }

    if config.cancellation_window_minutes < 0 || config.missed_grace_minutes < 0 {
        return Err(LinguaDeskError::Config(
            "Transition windows cannot be negative".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(LinguaDeskError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(LinguaDeskError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    if config.directory.is_empty() {
        return Err(LinguaDeskError::Config(
            "Log directory is required".to_string()
        ));
    }

    Ok(())
}
