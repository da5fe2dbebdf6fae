//! Teacher and availability models

use serde::{Deserialize, Serialize};
use chrono::{NaiveTime, Weekday};
use crate::models::common::Entity;
use crate::models::student::validate_person;
use crate::utils::errors::{LinguaDeskError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub hourly_rate: Option<f64>,
    pub bio: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Entity for Teacher {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Teacher {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn teaches(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l.eq_ignore_ascii_case(language))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub languages: Vec<String>,
    pub hourly_rate: Option<f64>,
    pub bio: Option<String>,
}

impl CreateTeacherRequest {
    pub fn validate(&self) -> Result<()> {
        validate_person(&self.first_name, &self.last_name, &self.email, self.phone.as_deref())?;
        if self.languages.is_empty() {
            return Err(LinguaDeskError::Validation("a teacher needs at least one language".to_string()));
        }
        if matches!(self.hourly_rate, Some(rate) if rate < 0.0) {
            return Err(LinguaDeskError::Validation("hourly rate cannot be negative".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly_rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

impl UpdateTeacherRequest {
    pub fn validate(&self) -> Result<()> {
        if matches!(&self.languages, Some(langs) if langs.is_empty()) {
            return Err(LinguaDeskError::Validation("a teacher needs at least one language".to_string()));
        }
        if matches!(self.hourly_rate, Some(rate) if rate < 0.0) {
            return Err(LinguaDeskError::Validation("hourly rate cannot be negative".to_string()));
        }
        Ok(())
    }
}

/// Weekly slot during which a teacher accepts lessons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilitySlot {
    pub id: i64,
    pub teacher_id: i64,
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default = "default_active")]
    pub recurring: bool,
}

impl Entity for AvailabilitySlot {
    fn id(&self) -> i64 {
        self.id
    }
}

impl AvailabilitySlot {
    pub fn overlaps(&self, other: &AvailabilitySlot) -> bool {
        self.day_of_week == other.day_of_week
            && self.start_time < other.end_time
            && other.start_time < self.end_time
    }

    /// Whether `[start, end)` on `day` fits entirely inside this slot
    pub fn covers(&self, day: Weekday, start: NaiveTime, end: NaiveTime) -> bool {
        self.day_of_week == day && self.start_time <= start && end <= self.end_time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAvailabilityRequest {
    pub day_of_week: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub recurring: bool,
}

impl CreateAvailabilityRequest {
    pub fn validate(&self) -> Result<()> {
        if self.end_time <= self.start_time {
            return Err(LinguaDeskError::Validation("slot must end after it starts".to_string()));
        }
        Ok(())
    }
}
