//! User and authentication models

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::utils::errors::LinguaDeskError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Teacher,
    Student,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Manager, Role::Teacher, Role::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Teacher => "TEACHER",
            Role::Student => "STUDENT",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = LinguaDeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let normalized = upper.trim_start_matches("ROLE_");
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| LinguaDeskError::UnknownRole(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    #[serde(default)]
    pub mfa_enabled: bool,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaVerifyRequest {
    pub mfa_token: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Access/refresh token pair issued by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Raw `/auth/login` response: either a full session or an MFA challenge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub mfa_required: bool,
    pub mfa_token: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<User>,
}

/// Authenticated session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
}

impl Session {
    pub fn tokens(&self) -> TokenPair {
        TokenPair {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Result of the first login step
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Authenticated(Session),
    MfaRequired { mfa_token: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("teacher".parse::<Role>().unwrap(), Role::Teacher);
        assert_eq!("ROLE_MANAGER".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!("role_student".parse::<Role>().unwrap(), Role::Student);
        assert_eq!(" Role_Admin ".parse::<Role>().unwrap(), Role::Admin);
        assert!("JANITOR".parse::<Role>().is_err());
    }

    #[test]
    fn test_login_response_with_mfa() {
        let json = r#"{"mfaRequired": true, "mfaToken": "abc"}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert!(response.mfa_required);
        assert_eq!(response.mfa_token.as_deref(), Some("abc"));
        assert!(response.user.is_none());
    }

    #[test]
    fn test_user_deserialization() {
        let json = r#"{"id": 7, "email": "t@school.com", "firstName": "Tom", "lastName": "Hale", "role": "TEACHER"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Teacher);
        assert!(!user.mfa_enabled);
        assert_eq!(user.full_name(), "Tom Hale");
    }
}
