//! Role-specific dashboard loading

use chrono::{DateTime, Duration, Utc};
use futures::future::{join_all, BoxFuture, FutureExt};
use serde::Serialize;
use tracing::{info, debug};
use crate::models::{LessonFilter, LessonStatus, ListQuery, Role, User};
use crate::services::ServiceFactory;
use crate::store::{AppState, AppStore, ThunkOutcome};
use super::DashboardSection;

/// How far back and ahead the dashboard lesson list reaches
const LESSONS_PAST_DAYS: i64 = 7;
const LESSONS_AHEAD_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dashboard {
    role: Role,
    user_id: i64,
}

impl Dashboard {
    pub fn new(role: Role, user_id: i64) -> Self {
        Self { role, user_id }
    }

    pub fn for_user(user: &User) -> Self {
        Self::new(user.role, user.id)
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn sections(&self) -> &'static [DashboardSection] {
        self.role.dashboard_sections()
    }

    /// Lesson query for the dashboard window, narrowed to the user for
    /// teachers and students
    pub fn lesson_filter(&self, now: DateTime<Utc>) -> LessonFilter {
        let mut filter = LessonFilter::between(
            now - Duration::days(LESSONS_PAST_DAYS),
            now + Duration::days(LESSONS_AHEAD_DAYS),
        );
        match self.role {
            Role::Teacher => filter.teacher_id = Some(self.user_id),
            Role::Student => filter.student_id = Some(self.user_id),
            Role::Admin | Role::Manager => {}
        }
        filter
    }

    /// Fetch every slice the role's sections need, concurrently.
    ///
    /// Sections that render from already-loaded data issue no request and
    /// are left out of the result.
    pub async fn load(
        &self,
        services: &ServiceFactory,
        store: &AppStore,
        now: DateTime<Utc>,
    ) -> Vec<(DashboardSection, ThunkOutcome)> {
        let all = ListQuery::default();
        let lessons = self.lesson_filter(now);

        let mut sections = Vec::new();
        let mut loads: Vec<BoxFuture<'_, ThunkOutcome>> = Vec::new();

        for &section in self.sections() {
            let load = match section {
                DashboardSection::Students => store.fetch_students(services, &all).boxed(),
                DashboardSection::Teachers => store.fetch_teachers(services, &all).boxed(),
                DashboardSection::Managers => store.fetch_managers(services, &all).boxed(),
                DashboardSection::Lessons | DashboardSection::MyLessons => {
                    store.fetch_lessons(services, &lessons).boxed()
                }
                DashboardSection::GroupLessons => store.fetch_group_lessons(services, &all).boxed(),
                DashboardSection::Packages => store.fetch_packages(services, &all).boxed(),
                DashboardSection::MyPackages => store.fetch_student_packages(services, self.user_id).boxed(),
                DashboardSection::Notifications => store.fetch_notifications(services).boxed(),
                DashboardSection::Overview | DashboardSection::Reports => continue,
            };
            sections.push(section);
            loads.push(load);
        }

        debug!(role = %self.role, requests = loads.len(), "Loading dashboard");
        let outcomes = join_all(loads).await;

        let failed = outcomes.iter().filter(|o| **o == ThunkOutcome::Failed).count();
        info!(role = %self.role, sections = outcomes.len(), failed = failed, "Dashboard loaded");

        sections.into_iter().zip(outcomes).collect()
    }
}

/// Headline numbers derived from the loaded slices
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub upcoming_lessons: usize,
    pub lessons_today: usize,
    pub awaiting_confirmation: usize,
    pub open_group_lessons: usize,
    pub active_students: usize,
    pub active_teachers: usize,
    pub packages_to_renew: usize,
    pub unread_notifications: u64,
    /// Error messages of slices whose last fetch failed
    pub errors: Vec<String>,
}

impl DashboardSummary {
    pub fn from_state(state: &AppState, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        let scheduled = || {
            state
                .lessons
                .items
                .iter()
                .filter(|l| l.status == LessonStatus::Scheduled)
        };

        let errors = [
            &state.students.error,
            &state.teachers.error,
            &state.managers.error,
            &state.lessons.error,
            &state.group_lessons.error,
            &state.packages.error,
            &state.notifications.error,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect();

        Self {
            upcoming_lessons: scheduled().filter(|l| l.start() >= now).count(),
            lessons_today: state
                .lessons
                .items
                .iter()
                .filter(|l| l.start().date_naive() == today)
                .count(),
            awaiting_confirmation: scheduled()
                .filter(|l| !l.teacher_confirmed && l.start() >= now)
                .count(),
            open_group_lessons: state
                .group_lessons
                .items
                .iter()
                .filter(|g| g.status.accepts_registrations() && !g.is_full())
                .count(),
            active_students: state.students.items.iter().filter(|s| s.active).count(),
            active_teachers: state.teachers.items.iter().filter(|t| t.active).count(),
            packages_to_renew: state
                .packages
                .items
                .iter()
                .filter(|p| p.is_exhausted() || p.is_expired(now))
                .count(),
            unread_notifications: state.unread_notifications,
            errors,
        }
    }
}
