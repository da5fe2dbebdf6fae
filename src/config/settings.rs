//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::time::Duration;
use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub scheduler: SchedulerConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// REST API client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub requests_per_second: u32,
}

/// Credentials used by the daemon to open a session
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub email: String,
    pub password: String,
    pub mfa_code: Option<String>,
}

/// Lesson status poller configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchedulerConfig {
    pub poll_interval_seconds: u64,
    pub cancellation_window_minutes: i64,
    pub missed_grace_minutes: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
    pub file_prefix: String,
    pub json: bool,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub auto_transitions: bool,
    pub client_validation: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("LINGUADESK").prefix_separator("_").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::LinguaDeskError> {
        super::validation::validate_settings(self)
    }

    /// Render the settings as TOML, with the password masked
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        let mut masked = self.clone();
        if !masked.auth.password.is_empty() {
            masked.auth.password = "********".to_string();
        }
        toml::to_string_pretty(&masked)
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl SchedulerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn cancellation_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.cancellation_window_minutes)
    }

    pub fn missed_grace(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.missed_grace_minutes)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080/api".to_string(),
                timeout_seconds: 10,
                user_agent: "LinguaDesk/0.1".to_string(),
                requests_per_second: 20,
            },
            auth: AuthConfig {
                email: String::new(),
                password: String::new(),
                mfa_code: None,
            },
            scheduler: SchedulerConfig {
                poll_interval_seconds: 60,
                cancellation_window_minutes: 60,
                missed_grace_minutes: 15,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                directory: "logs".to_string(),
                file_prefix: "linguadesk.log".to_string(),
                json: false,
            },
            features: FeaturesConfig {
                auto_transitions: true,
                client_validation: true,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scheduler_windows() {
        let settings = Settings::default();
        assert_eq!(settings.scheduler.cancellation_window(), chrono::Duration::hours(1));
        assert_eq!(settings.scheduler.missed_grace(), chrono::Duration::minutes(15));
        assert_eq!(settings.scheduler.poll_interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_to_toml_masks_password() {
        let mut settings = Settings::default();
        settings.auth.password = "hunter2".to_string();

        let rendered = settings.to_toml().unwrap();
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("base_url"));
    }
}
