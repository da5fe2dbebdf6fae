//! Calendar aggregation
//!
//! Merges individual and group lessons in a date range into one sorted
//! list of events, the data behind the scheduling calendar.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use crate::models::{GroupLesson, GroupLessonStatus, Lesson, LessonFilter, LessonStatus, ListQuery};
use crate::utils::errors::Result;
use super::{GroupLessonService, LessonService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CalendarEventKind {
    Lesson,
    GroupLesson,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub kind: CalendarEventKind,
    pub id: i64,
    pub teacher_id: i64,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub status: String,
    pub cancelled: bool,
}

impl From<&Lesson> for CalendarEvent {
    fn from(lesson: &Lesson) -> Self {
        Self {
            kind: CalendarEventKind::Lesson,
            id: lesson.id,
            teacher_id: lesson.teacher_id,
            title: lesson
                .topic
                .clone()
                .unwrap_or_else(|| format!("Lesson with student #{}", lesson.student_id)),
            start: lesson.start(),
            end: lesson.end(),
            status: lesson.status.to_string(),
            cancelled: lesson.status == LessonStatus::Cancelled,
        }
    }
}

impl From<&GroupLesson> for CalendarEvent {
    fn from(group: &GroupLesson) -> Self {
        Self {
            kind: CalendarEventKind::GroupLesson,
            id: group.id,
            teacher_id: group.teacher_id,
            title: group.title.clone(),
            start: group.date_time,
            end: group.end(),
            status: group.status.to_string(),
            cancelled: group.status == GroupLessonStatus::Cancelled,
        }
    }
}

/// Merge lessons and group lessons overlapping `[from, to)`, sorted by start
pub fn merge_events(lessons: &[Lesson], groups: &[GroupLesson], from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = lessons
        .iter()
        .map(CalendarEvent::from)
        .chain(groups.iter().map(CalendarEvent::from))
        .filter(|event| event.start < to && from < event.end)
        .collect();

    events.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));
    events
}

/// Events on a single calendar day
pub fn events_on(events: &[CalendarEvent], day: NaiveDate) -> Vec<&CalendarEvent> {
    events.iter().filter(|event| event.start.date_naive() == day).collect()
}

/// Pairs of non-cancelled events of the same teacher that overlap
pub fn find_conflicts(events: &[CalendarEvent]) -> Vec<(&CalendarEvent, &CalendarEvent)> {
    let active: Vec<&CalendarEvent> = events.iter().filter(|e| !e.cancelled).collect();
    let mut conflicts = Vec::new();

    for (i, a) in active.iter().enumerate() {
        for b in active.iter().skip(i + 1) {
            if a.teacher_id == b.teacher_id && a.start < b.end && b.start < a.end {
                conflicts.push((*a, *b));
            }
        }
    }
    conflicts
}

/// Calendar service combining lesson and group lesson lookups
#[derive(Clone)]
pub struct CalendarService {
    lessons: LessonService,
    group_lessons: GroupLessonService,
}

impl CalendarService {
    /// Create a new CalendarService instance
    pub fn new(lessons: LessonService, group_lessons: GroupLessonService) -> Self {
        Self { lessons, group_lessons }
    }

    pub async fn events(&self, from: DateTime<Utc>, to: DateTime<Utc>, teacher_id: Option<i64>) -> Result<Vec<CalendarEvent>> {
        let filter = LessonFilter {
            teacher_id,
            ..LessonFilter::between(from, to)
        };
        let all_groups = ListQuery::default();

        let (lessons, groups) = futures::try_join!(
            self.lessons.list(&filter),
            self.group_lessons.list(&all_groups),
        )?;

        let groups: Vec<GroupLesson> = groups
            .content
            .into_iter()
            .filter(|g| teacher_id.map_or(true, |id| g.teacher_id == id))
            .collect();

        Ok(merge_events(&lessons, &groups, from, to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn lesson(id: i64, teacher_id: i64, hour: u32, status: LessonStatus) -> Lesson {
        Lesson {
            id,
            teacher_id,
            student_id: 100 + id,
            date_time: Utc.with_ymd_and_hms(2024, 4, 1, hour, 0, 0).unwrap(),
            duration_minutes: 60,
            status,
            teacher_confirmed: true,
            topic: None,
            notes: None,
            package_id: None,
        }
    }

    fn group(id: i64, teacher_id: i64, hour: u32) -> GroupLesson {
        GroupLesson {
            id,
            teacher_id,
            title: "Grammar workshop".to_string(),
            language: None,
            level: None,
            date_time: Utc.with_ymd_and_hms(2024, 4, 1, hour, 30, 0).unwrap(),
            duration_minutes: 60,
            max_students: 8,
            student_ids: vec![],
            status: GroupLessonStatus::Scheduled,
        }
    }

    #[test]
    fn test_merge_sorts_and_filters_by_range() {
        let from = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        let to = from + Duration::hours(4);
        let lessons = vec![lesson(1, 1, 12, LessonStatus::Scheduled), lesson(2, 1, 9, LessonStatus::Scheduled), lesson(3, 1, 18, LessonStatus::Scheduled)];
        let groups = vec![group(7, 2, 10)];

        let events = merge_events(&lessons, &groups, from, to);
        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 7, 1]);
        assert_eq!(events[1].kind, CalendarEventKind::GroupLesson);
        assert_eq!(events[0].title, "Lesson with student #102");
    }

    #[test]
    fn test_conflicts_ignore_cancelled_and_other_teachers() {
        let from = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let to = from + Duration::days(1);
        let lessons = vec![
            lesson(1, 1, 10, LessonStatus::Scheduled),
            lesson(2, 1, 10, LessonStatus::Cancelled),
            lesson(3, 2, 10, LessonStatus::Scheduled),
        ];
        let groups = vec![group(9, 1, 10)];

        let events = merge_events(&lessons, &groups, from, to);
        let conflicts = find_conflicts(&events);
        assert_eq!(conflicts.len(), 1);
        assert_eq!((conflicts[0].0.id, conflicts[0].1.id), (1, 9));
    }

    #[test]
    fn test_events_on_day() {
        let from = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let events = merge_events(&[lesson(1, 1, 10, LessonStatus::Scheduled)], &[], from, from + Duration::days(2));
        assert_eq!(events_on(&events, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()).len(), 1);
        assert!(events_on(&events, NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()).is_empty());
    }
}
