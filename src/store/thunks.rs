//! Async actions that call a service and fold the result into the store

use tracing::{info, debug};
use crate::models::{
    CreateGroupLessonRequest, CreateLessonRequest, CreatePackageRequest, CreateStudentRequest,
    CreateTeacherRequest, GroupLesson, Lesson, LessonFilter, LessonPackage, LessonStatus,
    ListQuery, LoginOutcome, NotificationStatus, Student, Teacher, UpdateLessonRequest,
    UpdateStudentRequest, UpdateTeacherRequest,
};
use crate::services::ServiceFactory;
use crate::utils::errors::{AuthError, Result};
use super::{AppStore, LoadStatus, ThunkOutcome};

impl AppStore {
    // Auth

    /// Password step. Leaves `mfa_token` set when the backend asks for a code.
    pub async fn login(&self, services: &ServiceFactory, email: &str, password: &str) -> Result<LoginOutcome> {
        self.write(|s| {
            s.auth.status = LoadStatus::Loading;
            s.auth.error = None;
        })
        .await;

        let result = services.auth_service.login(email, password).await;

        self.write(|s| match &result {
            Ok(LoginOutcome::Authenticated(session)) => {
                s.auth.user = Some(session.user.clone());
                s.auth.mfa_token = None;
                s.auth.status = LoadStatus::Succeeded;
            }
            Ok(LoginOutcome::MfaRequired { mfa_token }) => {
                s.auth.mfa_token = Some(mfa_token.clone());
                s.auth.status = LoadStatus::Idle;
            }
            Err(e) => {
                s.auth.status = LoadStatus::Failed;
                s.auth.error = Some(e.user_message());
            }
        })
        .await;

        result
    }

    /// MFA step, using the token stored by `login`
    pub async fn verify_mfa(&self, services: &ServiceFactory, code: &str) -> Result<()> {
        let mfa_token = self
            .read(|s| s.auth.mfa_token.clone())
            .await
            .ok_or(AuthError::MfaRequired)?;

        self.write(|s| s.auth.status = LoadStatus::Loading).await;
        let result = services.auth_service.verify_mfa(&mfa_token, code).await;

        self.write(|s| match &result {
            Ok(session) => {
                s.auth.user = Some(session.user.clone());
                s.auth.mfa_token = None;
                s.auth.status = LoadStatus::Succeeded;
                s.auth.error = None;
            }
            Err(e) => {
                // Keep the MFA token so the user can retry the code
                s.auth.status = LoadStatus::Failed;
                s.auth.error = Some(e.user_message());
            }
        })
        .await;

        result.map(|_| ())
    }

    pub async fn logout(&self, services: &ServiceFactory) -> Result<()> {
        services.auth_service.logout().await?;
        self.reset().await;
        info!("Session cleared");
        Ok(())
    }

    // Fetches

    pub async fn fetch_students(&self, services: &ServiceFactory, query: &ListQuery) -> ThunkOutcome {
        self.run_thunk("students", |s| &mut s.students, async {
            Ok(services.student_service.list(query).await?.content)
        })
        .await
    }

    /// Students assigned to one manager
    pub async fn fetch_manager_students(&self, services: &ServiceFactory, manager_id: i64) -> ThunkOutcome {
        self.run_thunk("students", |s| &mut s.students, services.manager_service.students(manager_id))
            .await
    }

    pub async fn fetch_teachers(&self, services: &ServiceFactory, query: &ListQuery) -> ThunkOutcome {
        self.run_thunk("teachers", |s| &mut s.teachers, async {
            Ok(services.teacher_service.list(query).await?.content)
        })
        .await
    }

    pub async fn fetch_managers(&self, services: &ServiceFactory, query: &ListQuery) -> ThunkOutcome {
        self.run_thunk("managers", |s| &mut s.managers, async {
            Ok(services.manager_service.list(query).await?.content)
        })
        .await
    }

    pub async fn fetch_lessons(&self, services: &ServiceFactory, filter: &LessonFilter) -> ThunkOutcome {
        self.run_thunk("lessons", |s| &mut s.lessons, services.lesson_service.list(filter))
            .await
    }

    pub async fn fetch_group_lessons(&self, services: &ServiceFactory, query: &ListQuery) -> ThunkOutcome {
        self.run_thunk("group_lessons", |s| &mut s.group_lessons, async {
            Ok(services.group_lesson_service.list(query).await?.content)
        })
        .await
    }

    pub async fn fetch_packages(&self, services: &ServiceFactory, query: &ListQuery) -> ThunkOutcome {
        self.run_thunk("packages", |s| &mut s.packages, async {
            Ok(services.package_service.list(query).await?.content)
        })
        .await
    }

    pub async fn fetch_student_packages(&self, services: &ServiceFactory, student_id: i64) -> ThunkOutcome {
        self.run_thunk("packages", |s| &mut s.packages, services.package_service.for_student(student_id))
            .await
    }

    /// Notification list plus the unread badge count
    pub async fn fetch_notifications(&self, services: &ServiceFactory) -> ThunkOutcome {
        let outcome = self
            .run_thunk("notifications", |s| &mut s.notifications, services.notification_service.list(None))
            .await;
        if outcome == ThunkOutcome::Succeeded {
            self.refresh_unread_count(services).await;
        }
        outcome
    }

    pub async fn refresh_unread_count(&self, services: &ServiceFactory) {
        match services.notification_service.unread_count().await {
            Ok(count) => self.write(|s| s.unread_notifications = count).await,
            Err(e) => debug!(error = %e, "Could not refresh unread count"),
        }
    }

    // Mutations

    pub async fn create_student(&self, services: &ServiceFactory, request: &CreateStudentRequest) -> Result<Student> {
        self.apply_upsert(|s| &mut s.students, services.student_service.create(request))
            .await
    }

    pub async fn update_student(&self, services: &ServiceFactory, id: i64, request: &UpdateStudentRequest) -> Result<Student> {
        self.apply_upsert(|s| &mut s.students, services.student_service.update(id, request))
            .await
    }

    pub async fn delete_student(&self, services: &ServiceFactory, id: i64) -> Result<()> {
        self.apply_remove(|s| &mut s.students, id, services.student_service.delete(id))
            .await
    }

    pub async fn create_teacher(&self, services: &ServiceFactory, request: &CreateTeacherRequest) -> Result<Teacher> {
        self.apply_upsert(|s| &mut s.teachers, services.teacher_service.create(request))
            .await
    }

    pub async fn update_teacher(&self, services: &ServiceFactory, id: i64, request: &UpdateTeacherRequest) -> Result<Teacher> {
        self.apply_upsert(|s| &mut s.teachers, services.teacher_service.update(id, request))
            .await
    }

    pub async fn delete_teacher(&self, services: &ServiceFactory, id: i64) -> Result<()> {
        self.apply_remove(|s| &mut s.teachers, id, services.teacher_service.delete(id))
            .await
    }

    pub async fn create_lesson(&self, services: &ServiceFactory, request: &CreateLessonRequest) -> Result<Lesson> {
        self.apply_upsert(|s| &mut s.lessons, services.lesson_service.create(request))
            .await
    }

    pub async fn update_lesson(&self, services: &ServiceFactory, id: i64, request: &UpdateLessonRequest) -> Result<Lesson> {
        self.apply_upsert(|s| &mut s.lessons, services.lesson_service.update(id, request))
            .await
    }

    pub async fn delete_lesson(&self, services: &ServiceFactory, id: i64) -> Result<()> {
        self.apply_remove(|s| &mut s.lessons, id, services.lesson_service.delete(id))
            .await
    }

    /// Manual status change, checked against the allowed transitions
    pub async fn change_lesson_status(&self, services: &ServiceFactory, lesson: &Lesson, next: LessonStatus) -> Result<Lesson> {
        self.apply_upsert(|s| &mut s.lessons, services.lesson_service.change_status(lesson, next))
            .await
    }

    /// Teacher confirmation, then a refetch of the confirmed lesson
    pub async fn confirm_lesson(&self, services: &ServiceFactory, id: i64) -> Result<Lesson> {
        self.apply_upsert(|s| &mut s.lessons, async {
            services.lesson_service.confirm(id).await?;
            services.lesson_service.get(id).await
        })
        .await
    }

    pub async fn create_group_lesson(&self, services: &ServiceFactory, request: &CreateGroupLessonRequest) -> Result<GroupLesson> {
        self.apply_upsert(|s| &mut s.group_lessons, services.group_lesson_service.create(request))
            .await
    }

    /// Register a student and refetch the group so the roster is current
    pub async fn register_for_group(&self, services: &ServiceFactory, group: &GroupLesson, student_id: i64) -> Result<GroupLesson> {
        self.apply_upsert(|s| &mut s.group_lessons, async {
            services.group_lesson_service.register_student(group, student_id).await?;
            services.group_lesson_service.get(group.id).await
        })
        .await
    }

    pub async fn delete_group_lesson(&self, services: &ServiceFactory, id: i64) -> Result<()> {
        self.apply_remove(|s| &mut s.group_lessons, id, services.group_lesson_service.delete(id))
            .await
    }

    pub async fn create_package(&self, services: &ServiceFactory, request: &CreatePackageRequest) -> Result<LessonPackage> {
        self.apply_upsert(|s| &mut s.packages, services.package_service.create(request))
            .await
    }

    pub async fn delete_package(&self, services: &ServiceFactory, id: i64) -> Result<()> {
        self.apply_remove(|s| &mut s.packages, id, services.package_service.delete(id))
            .await
    }

    pub async fn mark_notification_read(&self, services: &ServiceFactory, id: i64) -> Result<()> {
        services.notification_service.mark_read(id).await?;
        self.write(|s| {
            if let Some(n) = s.notifications.items.iter_mut().find(|n| n.id == id && n.is_unread()) {
                n.status = NotificationStatus::Read;
                s.unread_notifications = s.unread_notifications.saturating_sub(1);
            }
        })
        .await;
        Ok(())
    }

    pub async fn mark_all_notifications_read(&self, services: &ServiceFactory) -> Result<()> {
        services.notification_service.mark_all_read().await?;
        self.write(|s| {
            for n in s.notifications.items.iter_mut().filter(|n| n.is_unread()) {
                n.status = NotificationStatus::Read;
            }
            s.unread_notifications = 0;
        })
        .await;
        Ok(())
    }
}
