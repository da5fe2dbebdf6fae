//! Individual lesson model

use std::fmt;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Duration, Utc};
use crate::models::common::Entity;
use crate::utils::errors::{LinguaDeskError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LessonStatus {
    Scheduled,
    Conducted,
    Completed,
    Cancelled,
    Missed,
}

impl LessonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LessonStatus::Scheduled => "SCHEDULED",
            LessonStatus::Conducted => "CONDUCTED",
            LessonStatus::Completed => "COMPLETED",
            LessonStatus::Cancelled => "CANCELLED",
            LessonStatus::Missed => "MISSED",
        }
    }

    /// No automatic or manual transition leaves a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, LessonStatus::Completed | LessonStatus::Cancelled | LessonStatus::Missed)
    }

    /// Statuses a user may move a lesson to by hand
    pub fn allowed_next(&self) -> &'static [LessonStatus] {
        match self {
            LessonStatus::Scheduled => &[LessonStatus::Conducted, LessonStatus::Cancelled, LessonStatus::Missed],
            LessonStatus::Conducted => &[LessonStatus::Completed, LessonStatus::Cancelled],
            _ => &[],
        }
    }

    pub fn can_transition_to(&self, next: LessonStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: i64,
    pub teacher_id: i64,
    pub student_id: i64,
    pub date_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub status: LessonStatus,
    #[serde(default)]
    pub teacher_confirmed: bool,
    pub topic: Option<String>,
    pub notes: Option<String>,
    pub package_id: Option<i64>,
}

impl Entity for Lesson {
    fn id(&self) -> i64 {
        self.id
    }
}

/// `start + minutes`, or `None` when the result is not a representable instant
pub(crate) fn end_of(start: DateTime<Utc>, minutes: i64) -> Option<DateTime<Utc>> {
    Duration::try_minutes(minutes).and_then(|length| start.checked_add_signed(length))
}

impl Lesson {
    pub fn start(&self) -> DateTime<Utc> {
        self.date_time
    }

    /// End instant, `None` when the backend sent an out-of-range duration
    pub fn try_end(&self) -> Option<DateTime<Utc>> {
        end_of(self.date_time, self.duration_minutes)
    }

    /// End instant, clamped to the latest representable time
    pub fn end(&self) -> DateTime<Utc> {
        self.try_end().unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Half-open `[start, end)` containment
    pub fn is_in_progress_at(&self, now: DateTime<Utc>) -> bool {
        self.try_end().is_some_and(|end| self.start() <= now && now < end)
    }

    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start() < end && start < self.end()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonRequest {
    pub teacher_id: i64,
    pub student_id: i64,
    pub date_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub topic: Option<String>,
    pub package_id: Option<i64>,
}

impl CreateLessonRequest {
    pub fn validate(&self) -> Result<()> {
        if self.duration_minutes <= 0 {
            return Err(LinguaDeskError::Validation("lesson duration must be positive".to_string()));
        }
        if end_of(self.date_time, self.duration_minutes).is_none() {
            return Err(LinguaDeskError::Validation("lesson duration is out of range".to_string()));
        }
        Ok(())
    }

    pub fn end(&self) -> DateTime<Utc> {
        end_of(self.date_time, self.duration_minutes).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLessonRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateLessonRequest {
    pub fn validate(&self) -> Result<()> {
        if matches!(self.duration_minutes, Some(d) if d <= 0) {
            return Err(LinguaDeskError::Validation("lesson duration must be positive".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateRequest<S> {
    pub status: S,
}

/// Filters for `GET /lessons`
#[derive(Debug, Clone, Default)]
pub struct LessonFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
    pub status: Option<LessonStatus>,
}

impl LessonFilter {
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
            ..Default::default()
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(from) = self.from {
            pairs.push(("from", from.to_rfc3339()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.to_rfc3339()));
        }
        if let Some(teacher_id) = self.teacher_id {
            pairs.push(("teacherId", teacher_id.to_string()));
        }
        if let Some(student_id) = self.student_id {
            pairs.push(("studentId", student_id.to_string()));
        }
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn lesson_at(hour: u32) -> Lesson {
        Lesson {
            id: 1,
            teacher_id: 2,
            student_id: 3,
            date_time: Utc.with_ymd_and_hms(2024, 5, 6, hour, 0, 0).unwrap(),
            duration_minutes: 60,
            status: LessonStatus::Scheduled,
            teacher_confirmed: true,
            topic: None,
            notes: None,
            package_id: None,
        }
    }

    #[test]
    fn test_in_progress_window_is_half_open() {
        let lesson = lesson_at(10);
        assert!(lesson.is_in_progress_at(lesson.start()));
        assert!(!lesson.is_in_progress_at(lesson.end()));
        assert!(!lesson.is_in_progress_at(lesson.start() - Duration::seconds(1)));
    }

    #[test]
    fn test_terminal_statuses_have_no_next() {
        for status in [LessonStatus::Completed, LessonStatus::Cancelled, LessonStatus::Missed] {
            assert!(status.is_terminal());
            assert!(status.allowed_next().is_empty());
        }
        assert!(LessonStatus::Scheduled.can_transition_to(LessonStatus::Conducted));
        assert!(!LessonStatus::Scheduled.can_transition_to(LessonStatus::Completed));
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&StatusUpdateRequest { status: LessonStatus::Conducted }).unwrap();
        assert_eq!(json, r#"{"status":"CONDUCTED"}"#);
    }

    #[test]
    fn test_overlap() {
        let lesson = lesson_at(10);
        assert!(lesson.overlaps(lesson.start() + Duration::minutes(30), lesson.end() + Duration::minutes(30)));
        assert!(!lesson.overlaps(lesson.end(), lesson.end() + Duration::minutes(60)));
    }

    #[test]
    fn test_out_of_range_duration_has_no_end() {
        let mut lesson = lesson_at(10);
        lesson.duration_minutes = i64::MAX;
        assert_eq!(lesson.try_end(), None);
        assert_eq!(lesson.end(), DateTime::<Utc>::MAX_UTC);
        assert!(!lesson.is_in_progress_at(lesson.start()));
        assert!(!lesson.is_in_progress_at(lesson.start() + Duration::minutes(5)));
    }

    #[test]
    fn test_create_request_rejects_unrepresentable_end() {
        let request = CreateLessonRequest {
            teacher_id: 2,
            student_id: 3,
            date_time: Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap(),
            duration_minutes: i64::MAX,
            topic: None,
            package_id: None,
        };
        assert!(matches!(request.validate(), Err(LinguaDeskError::Validation(_))));
    }
}
