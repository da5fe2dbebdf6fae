//! LinguaDesk
//!
//! Headless client for an online language school's CRM backend.
//! This library provides typed REST services for students, teachers,
//! managers, lessons, group lessons, packages, notifications and reports,
//! a role-aware client-side store, and the poller that drives automatic
//! lesson status transitions.

#![allow(non_snake_case)]

pub mod api;
pub mod config;
pub mod models;
pub mod roles;
pub mod services;
pub mod store;
pub mod transitions;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{LinguaDeskError, Result};

// Re-export main components for easy access
pub use api::ApiClient;
pub use services::ServiceFactory;
pub use store::AppStore;
pub use transitions::{LessonStatusTransitionService, RuleTable, TransitionScheduler};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
