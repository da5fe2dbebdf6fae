//! Student model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::models::common::Entity;
use crate::utils::errors::{LinguaDeskError, Result};
use crate::utils::helpers::{is_valid_email, is_valid_phone};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub level: Option<String>,
    pub native_language: Option<String>,
    pub manager_id: Option<i64>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

impl Entity for Student {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub level: Option<String>,
    pub native_language: Option<String>,
    pub manager_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Shared person-form checks for students, teachers and managers
pub(crate) fn validate_person(first_name: &str, last_name: &str, email: &str, phone: Option<&str>) -> Result<()> {
    if first_name.trim().is_empty() || last_name.trim().is_empty() {
        return Err(LinguaDeskError::Validation("first and last name are required".to_string()));
    }
    if !is_valid_email(email) {
        return Err(LinguaDeskError::Validation(format!("invalid email: {}", email)));
    }
    if let Some(phone) = phone {
        if !is_valid_phone(phone) {
            return Err(LinguaDeskError::Validation(format!("invalid phone: {}", phone)));
        }
    }
    Ok(())
}

impl CreateStudentRequest {
    pub fn validate(&self) -> Result<()> {
        validate_person(&self.first_name, &self.last_name, &self.email, self.phone.as_deref())
    }
}

impl UpdateStudentRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(email) = &self.email {
            if !is_valid_email(email) {
                return Err(LinguaDeskError::Validation(format!("invalid email: {}", email)));
            }
        }
        if matches!(&self.first_name, Some(name) if name.trim().is_empty()) {
            return Err(LinguaDeskError::Validation("first name cannot be blank".to_string()));
        }
        Ok(())
    }
}
