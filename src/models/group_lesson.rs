//! Group lesson model

use std::fmt;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::models::common::Entity;
use crate::models::lesson::end_of;
use crate::utils::errors::{LinguaDeskError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupLessonStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Postponed,
}

impl GroupLessonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupLessonStatus::Scheduled => "SCHEDULED",
            GroupLessonStatus::Confirmed => "CONFIRMED",
            GroupLessonStatus::InProgress => "IN_PROGRESS",
            GroupLessonStatus::Completed => "COMPLETED",
            GroupLessonStatus::Cancelled => "CANCELLED",
            GroupLessonStatus::Postponed => "POSTPONED",
        }
    }

    /// Students may only join or leave before the lesson starts
    pub fn accepts_registrations(&self) -> bool {
        matches!(
            self,
            GroupLessonStatus::Scheduled | GroupLessonStatus::Confirmed | GroupLessonStatus::Postponed
        )
    }
}

impl fmt::Display for GroupLessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLesson {
    pub id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub language: Option<String>,
    pub level: Option<String>,
    pub date_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub max_students: u32,
    #[serde(default)]
    pub student_ids: Vec<i64>,
    pub status: GroupLessonStatus,
}

impl Entity for GroupLesson {
    fn id(&self) -> i64 {
        self.id
    }
}

impl GroupLesson {
    pub fn end(&self) -> DateTime<Utc> {
        end_of(self.date_time, self.duration_minutes).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn seats_left(&self) -> u32 {
        self.max_students.saturating_sub(self.student_ids.len() as u32)
    }

    pub fn is_full(&self) -> bool {
        self.seats_left() == 0
    }

    pub fn is_registered(&self, student_id: i64) -> bool {
        self.student_ids.contains(&student_id)
    }

    /// Client-side pre-check before asking the backend to register a student
    pub fn check_can_register(&self, student_id: i64) -> Result<()> {
        if !self.status.accepts_registrations() {
            return Err(LinguaDeskError::Validation(format!(
                "group lesson {} is {} and no longer accepts registrations",
                self.id, self.status
            )));
        }
        if self.is_registered(student_id) {
            return Err(LinguaDeskError::Validation(format!(
                "student {} is already registered for group lesson {}",
                student_id, self.id
            )));
        }
        if self.is_full() {
            return Err(LinguaDeskError::Validation(format!("group lesson {} is full", self.id)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupLessonRequest {
    pub teacher_id: i64,
    pub title: String,
    pub language: Option<String>,
    pub level: Option<String>,
    pub date_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub max_students: u32,
}

impl CreateGroupLessonRequest {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(LinguaDeskError::Validation("group lesson title is required".to_string()));
        }
        if self.duration_minutes <= 0 {
            return Err(LinguaDeskError::Validation("lesson duration must be positive".to_string()));
        }
        if self.max_students == 0 {
            return Err(LinguaDeskError::Validation("group capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupLessonRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_students: Option<u32>,
}
