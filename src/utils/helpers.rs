//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use std::sync::OnceLock;
use chrono::NaiveDate;
use regex::Regex;
use uuid::Uuid;

/// Generate a new request correlation id
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Truncate text to a maximum length with ellipsis
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        text.to_string()
    } else {
        let kept: String = text.chars().take(max_length.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    })
}

fn mfa_code_regex() -> &'static Regex {
    static MFA: OnceLock<Regex> = OnceLock::new();
    MFA.get_or_init(|| Regex::new(r"^\d{6}$").expect("mfa regex is valid"))
}

/// Validate email format
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Validate a six digit one-time code
pub fn is_valid_mfa_code(code: &str) -> bool {
    mfa_code_regex().is_match(code)
}

/// Validate phone number format (basic validation)
pub fn is_valid_phone(phone: &str) -> bool {
    phone.chars().all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c == ' ')
        && phone.len() >= 10
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build an export file name such as `lessons_2024-01-01_2024-01-31.csv`
pub fn export_file_name(prefix: &str, from: NaiveDate, to: NaiveDate, extension: &str) -> String {
    sanitize_filename(&format!(
        "{}_{}_{}.{}",
        prefix.to_lowercase(),
        from.format("%Y-%m-%d"),
        to.format("%Y-%m-%d"),
        extension
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 8), "hello...");
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("anna@school.com"));
        assert!(!is_valid_email("anna@school"));
        assert!(!is_valid_email("anna school@x.com"));
    }

    #[test]
    fn test_mfa_code_validation() {
        assert!(is_valid_mfa_code("123456"));
        assert!(!is_valid_mfa_code("12345"));
        assert!(!is_valid_mfa_code("12a456"));
    }

    #[test]
    fn test_export_file_name() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(export_file_name("Lessons", from, to, "csv"), "lessons_2024-01-01_2024-01-31.csv");
        assert_eq!(export_file_name("a b/c", from, to, "pdf"), "a_b_c_2024-01-01_2024-01-31.pdf");
    }
}
