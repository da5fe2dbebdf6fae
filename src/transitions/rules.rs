//! Lesson status transition rule table
//!
//! An ordered list of rules, each a (from, to, predicate) triple. Rules are
//! scanned in order and only the first matching rule applies; later rules
//! are not consulted for that lesson in the same evaluation.

use std::fmt;
use chrono::{DateTime, Duration, Utc};
use tracing::warn;
use crate::config::SchedulerConfig;
use crate::models::{Lesson, LessonStatus};

/// Time windows the predicates are parameterised by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleWindows {
    /// How close to the start an unconfirmed lesson gets cancelled
    pub cancellation_window: Duration,
    /// How long after the start a never-started lesson counts as missed
    pub missed_grace: Duration,
}

impl Default for RuleWindows {
    fn default() -> Self {
        Self {
            cancellation_window: Duration::hours(1),
            missed_grace: Duration::minutes(15),
        }
    }
}

impl From<&SchedulerConfig> for RuleWindows {
    fn from(config: &SchedulerConfig) -> Self {
        Self {
            cancellation_window: config.cancellation_window(),
            missed_grace: config.missed_grace(),
        }
    }
}

pub type Predicate = fn(&Lesson, DateTime<Utc>, &RuleWindows) -> bool;

#[derive(Clone)]
pub struct TransitionRule {
    pub name: &'static str,
    pub from: LessonStatus,
    pub to: LessonStatus,
    pub condition: Predicate,
}

impl fmt::Debug for TransitionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionRule")
            .field("name", &self.name)
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

impl TransitionRule {
    pub fn matches(&self, lesson: &Lesson, now: DateTime<Utc>, windows: &RuleWindows) -> bool {
        lesson.status == self.from && (self.condition)(lesson, now, windows)
    }
}

/// A decided status change for one lesson
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub lesson_id: i64,
    pub from: LessonStatus,
    pub to: LessonStatus,
    pub rule: &'static str,
}

/// End instant, logged and skipped when the duration does not fit a timestamp
fn lesson_end(lesson: &Lesson) -> Option<DateTime<Utc>> {
    let end = lesson.try_end();
    if end.is_none() {
        warn!(
            lesson_id = lesson.id,
            duration_minutes = lesson.duration_minutes,
            "Lesson end is out of range"
        );
    }
    end
}

fn lesson_started(lesson: &Lesson, now: DateTime<Utc>, _: &RuleWindows) -> bool {
    lesson_end(lesson).is_some() && lesson.is_in_progress_at(now)
}

fn lesson_ended(lesson: &Lesson, now: DateTime<Utc>, _: &RuleWindows) -> bool {
    lesson_end(lesson).is_some_and(|end| now >= end)
}

fn unconfirmed_close_to_start(lesson: &Lesson, now: DateTime<Utc>, windows: &RuleWindows) -> bool {
    !lesson.teacher_confirmed && lesson.start() - now <= windows.cancellation_window
}

fn grace_period_elapsed(lesson: &Lesson, now: DateTime<Utc>, windows: &RuleWindows) -> bool {
    lesson
        .start()
        .checked_add_signed(windows.missed_grace)
        .is_some_and(|deadline| now > deadline)
}

#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<TransitionRule>,
    windows: RuleWindows,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::new(RuleWindows::default())
    }
}

impl RuleTable {
    /// The standard table, in precedence order
    pub fn new(windows: RuleWindows) -> Self {
        let rules = vec![
            TransitionRule {
                name: "start_lesson",
                from: LessonStatus::Scheduled,
                to: LessonStatus::Conducted,
                condition: lesson_started,
            },
            TransitionRule {
                name: "complete_lesson",
                from: LessonStatus::Conducted,
                to: LessonStatus::Completed,
                condition: lesson_ended,
            },
            TransitionRule {
                name: "cancel_unconfirmed",
                from: LessonStatus::Scheduled,
                to: LessonStatus::Cancelled,
                condition: unconfirmed_close_to_start,
            },
            TransitionRule {
                name: "mark_missed",
                from: LessonStatus::Scheduled,
                to: LessonStatus::Missed,
                condition: grace_period_elapsed,
            },
        ];

        Self { rules, windows }
    }

    /// Build a table from an explicit rule list
    pub fn with_rules(rules: Vec<TransitionRule>, windows: RuleWindows) -> Self {
        Self { rules, windows }
    }

    pub fn rules(&self) -> &[TransitionRule] {
        &self.rules
    }

    pub fn windows(&self) -> &RuleWindows {
        &self.windows
    }

    /// First matching rule for `lesson` at `now`, if any
    pub fn evaluate(&self, lesson: &Lesson, now: DateTime<Utc>) -> Option<Transition> {
        if lesson.status.is_terminal() {
            return None;
        }

        self.rules
            .iter()
            .find(|rule| rule.matches(lesson, now, &self.windows))
            .map(|rule| Transition {
                lesson_id: lesson.id,
                from: rule.from,
                to: rule.to,
                rule: rule.name,
            })
    }

    /// Evaluate a batch, keeping only lessons with a due transition
    pub fn evaluate_all(&self, lessons: &[Lesson], now: DateTime<Utc>) -> Vec<Transition> {
        lessons.iter().filter_map(|lesson| self.evaluate(lesson, now)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 3, 14, 0, 0).unwrap()
    }

    fn lesson(status: LessonStatus, confirmed: bool) -> Lesson {
        Lesson {
            id: 42,
            teacher_id: 1,
            student_id: 2,
            date_time: start(),
            duration_minutes: 60,
            status,
            teacher_confirmed: confirmed,
            topic: None,
            notes: None,
            package_id: None,
        }
    }

    fn to(table: &RuleTable, lesson: &Lesson, now: DateTime<Utc>) -> Option<LessonStatus> {
        table.evaluate(lesson, now).map(|t| t.to)
    }

    #[test]
    fn test_scheduled_lesson_in_progress_is_conducted() {
        let table = RuleTable::default();
        let l = lesson(LessonStatus::Scheduled, true);
        assert_eq!(to(&table, &l, start()), Some(LessonStatus::Conducted));
        assert_eq!(to(&table, &l, start() + Duration::minutes(59)), Some(LessonStatus::Conducted));
    }

    #[test]
    fn test_conducted_lesson_after_end_is_completed() {
        let table = RuleTable::default();
        let l = lesson(LessonStatus::Conducted, true);
        assert_eq!(to(&table, &l, start() + Duration::minutes(30)), None);
        assert_eq!(to(&table, &l, start() + Duration::minutes(60)), Some(LessonStatus::Completed));
    }

    #[test]
    fn test_unconfirmed_lesson_within_an_hour_is_cancelled() {
        let table = RuleTable::default();
        let l = lesson(LessonStatus::Scheduled, false);
        assert_eq!(to(&table, &l, start() - Duration::minutes(61)), None);
        assert_eq!(to(&table, &l, start() - Duration::minutes(60)), Some(LessonStatus::Cancelled));
        assert_eq!(to(&table, &l, start() - Duration::minutes(5)), Some(LessonStatus::Cancelled));
    }

    #[test]
    fn test_confirmed_lesson_before_start_is_left_alone() {
        let table = RuleTable::default();
        let l = lesson(LessonStatus::Scheduled, true);
        assert_eq!(to(&table, &l, start() - Duration::minutes(5)), None);
    }

    #[test]
    fn test_in_progress_rule_wins_over_cancellation() {
        let table = RuleTable::default();
        let l = lesson(LessonStatus::Scheduled, false);
        // Both "start_lesson" and "cancel_unconfirmed" hold; the first wins
        let transition = table.evaluate(&l, start() + Duration::minutes(20)).unwrap();
        assert_eq!(transition.to, LessonStatus::Conducted);
        assert_eq!(transition.rule, "start_lesson");
    }

    #[test]
    fn test_cancellation_masks_missed_after_end() {
        let table = RuleTable::default();
        let now = start() + Duration::minutes(90);

        let unconfirmed = lesson(LessonStatus::Scheduled, false);
        assert_eq!(to(&table, &unconfirmed, now), Some(LessonStatus::Cancelled));

        let confirmed = lesson(LessonStatus::Scheduled, true);
        assert_eq!(to(&table, &confirmed, now), Some(LessonStatus::Missed));
    }

    #[test]
    fn test_short_lesson_missed_after_grace() {
        let table = RuleTable::default();
        let mut l = lesson(LessonStatus::Scheduled, true);
        l.duration_minutes = 10;
        assert_eq!(to(&table, &l, start() + Duration::minutes(12)), None);
        assert_eq!(to(&table, &l, start() + Duration::minutes(16)), Some(LessonStatus::Missed));
    }

    #[test]
    fn test_custom_windows() {
        let table = RuleTable::new(RuleWindows {
            cancellation_window: Duration::hours(3),
            missed_grace: Duration::minutes(5),
        });
        let l = lesson(LessonStatus::Scheduled, false);
        assert_eq!(to(&table, &l, start() - Duration::hours(2)), Some(LessonStatus::Cancelled));
    }

    #[test]
    fn test_evaluate_all_skips_lessons_without_transition() {
        let table = RuleTable::default();
        let mut done = lesson(LessonStatus::Completed, true);
        done.id = 1;
        let mut running = lesson(LessonStatus::Scheduled, true);
        running.id = 2;

        let transitions = table.evaluate_all(&[done, running], start() + Duration::minutes(1));
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].lesson_id, 2);
    }

    #[test]
    fn test_out_of_range_duration_does_not_panic() {
        let table = RuleTable::default();
        let mut scheduled = lesson(LessonStatus::Scheduled, true);
        scheduled.duration_minutes = i64::MAX;
        assert_eq!(to(&table, &scheduled, start() + Duration::minutes(5)), None);
        assert_eq!(to(&table, &scheduled, start() + Duration::minutes(20)), Some(LessonStatus::Missed));

        let mut conducted = lesson(LessonStatus::Conducted, true);
        conducted.duration_minutes = i64::MAX;
        assert_eq!(to(&table, &conducted, start() + Duration::days(365)), None);
    }

    fn any_status() -> impl Strategy<Value = LessonStatus> {
        prop_oneof![
            Just(LessonStatus::Scheduled),
            Just(LessonStatus::Conducted),
            Just(LessonStatus::Completed),
            Just(LessonStatus::Cancelled),
            Just(LessonStatus::Missed),
        ]
    }

    proptest! {
        #[test]
        fn prop_terminal_statuses_never_transition(
            status in any_status(),
            confirmed in any::<bool>(),
            offset_minutes in -600i64..600,
            duration in 1i64..240,
        ) {
            let table = RuleTable::default();
            let mut l = lesson(status, confirmed);
            l.duration_minutes = duration;
            let result = table.evaluate(&l, start() + Duration::minutes(offset_minutes));
            if status.is_terminal() {
                prop_assert!(result.is_none());
            }
        }

        #[test]
        fn prop_transition_leaves_current_status(
            status in any_status(),
            confirmed in any::<bool>(),
            offset_minutes in -600i64..600,
            duration in 1i64..240,
        ) {
            let table = RuleTable::default();
            let mut l = lesson(status, confirmed);
            l.duration_minutes = duration;
            if let Some(t) = table.evaluate(&l, start() + Duration::minutes(offset_minutes)) {
                prop_assert_eq!(t.from, status);
                prop_assert_ne!(t.to, status);
                prop_assert!(status.can_transition_to(t.to), "{} -> {} not allowed", status, t.to);
                prop_assert_eq!(t.lesson_id, l.id);
            }
        }

        #[test]
        fn prop_scheduled_lesson_in_progress_is_conducted(
            confirmed in any::<bool>(),
            duration in 1i64..240,
            elapsed in 0.0f64..1.0,
        ) {
            let table = RuleTable::default();
            let mut l = lesson(LessonStatus::Scheduled, confirmed);
            l.duration_minutes = duration;
            let offset_seconds = (elapsed * (duration * 60) as f64) as i64;
            let now = start() + Duration::seconds(offset_seconds);
            let transition = table.evaluate(&l, now);
            prop_assert_eq!(transition.map(|t| t.to), Some(LessonStatus::Conducted));
            prop_assert_eq!(transition.map(|t| t.rule), Some("start_lesson"));
        }
    }
}
