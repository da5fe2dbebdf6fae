//! Error handling for LinguaDesk
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for LinguaDesk
#[derive(Error, Debug)]
pub enum LinguaDeskError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown role: {0}")]
    UnknownRole(String),
}

/// Errors raised by the HTTP client layer
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request timed out")]
    Timeout,

    #[error("API unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unauthorized: session is missing or expired")]
    Unauthorized,

    #[error("Invalid API request: {0}")]
    InvalidRequest(String),

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),
}

/// Authentication specific errors
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Session expired and could not be refreshed")]
    SessionExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("MFA verification required")]
    MfaRequired,

    #[error("Invalid MFA code: {0}")]
    InvalidMfaCode(String),

    #[error("Malformed access token: {0}")]
    MalformedToken(String),
}

/// Result type alias for LinguaDesk operations
pub type Result<T> = std::result::Result<T, LinguaDeskError>;

/// Result type alias for raw API client operations
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl LinguaDeskError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            LinguaDeskError::Api(ApiError::Status { status, .. }) => *status >= 500 || *status == 429,
            LinguaDeskError::Api(ApiError::InvalidResponse(_)) => false,
            LinguaDeskError::Api(ApiError::InvalidRequest(_)) => false,
            LinguaDeskError::Api(ApiError::Unauthorized) => false,
            LinguaDeskError::Api(_) => true,
            LinguaDeskError::Auth(AuthError::SessionExpired) => true,
            LinguaDeskError::Auth(_) => false,
            LinguaDeskError::Config(_) => false,
            LinguaDeskError::PermissionDenied(_) => false,
            LinguaDeskError::NotFound { .. } => false,
            LinguaDeskError::InvalidStatusTransition { .. } => false,
            LinguaDeskError::Validation(_) => false,
            LinguaDeskError::Serialization(_) => false,
            LinguaDeskError::Io(_) => true,
            LinguaDeskError::UnknownRole(_) => false,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LinguaDeskError::Config(_) => ErrorSeverity::Critical,
            LinguaDeskError::Auth(_) => ErrorSeverity::Warning,
            LinguaDeskError::Api(ApiError::Unauthorized) => ErrorSeverity::Warning,
            LinguaDeskError::PermissionDenied(_) => ErrorSeverity::Warning,
            LinguaDeskError::Validation(_) => ErrorSeverity::Info,
            LinguaDeskError::NotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }

    /// Short message suitable for an error banner on a store slice
    pub fn user_message(&self) -> String {
        match self {
            LinguaDeskError::Api(ApiError::Status { message, .. }) if !message.is_empty() => message.clone(),
            LinguaDeskError::Api(ApiError::Timeout) => "The server took too long to respond".to_string(),
            LinguaDeskError::Api(ApiError::Unavailable(_)) => "The server is unreachable".to_string(),
            LinguaDeskError::Auth(AuthError::SessionExpired) | LinguaDeskError::Api(ApiError::Unauthorized) => {
                "Your session has expired, please log in again".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_errors_are_recoverable() {
        let err = LinguaDeskError::Api(ApiError::Status { status: 503, message: "down".to_string() });
        assert!(err.is_recoverable());

        let err = LinguaDeskError::Api(ApiError::Status { status: 404, message: "missing".to_string() });
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_user_message_prefers_backend_message() {
        let err = LinguaDeskError::Api(ApiError::Status { status: 400, message: "Email already taken".to_string() });
        assert_eq!(err.user_message(), "Email already taken");

        let err = LinguaDeskError::Validation("email is invalid".to_string());
        assert_eq!(err.user_message(), "Validation failed: email is invalid");
    }

    #[test]
    fn test_severity() {
        assert_eq!(LinguaDeskError::Config("x".to_string()).severity(), ErrorSeverity::Critical);
        assert_eq!(LinguaDeskError::Auth(AuthError::NotAuthenticated).severity(), ErrorSeverity::Warning);
        assert_eq!(ErrorSeverity::Warning.to_string(), "WARN");
    }
}
