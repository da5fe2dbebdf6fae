//! Services module
//!
//! One service per backend resource, all sharing a single `ApiClient`
//! (and therefore one token store and one rate limiter).

pub mod auth;
pub mod calendar;
pub mod group_lesson;
pub mod lesson;
pub mod manager;
pub mod notification;
pub mod package;
pub mod report;
pub mod resource;
pub mod student;
pub mod teacher;

// Re-export commonly used services
pub use auth::AuthService;
pub use calendar::{CalendarService, CalendarEvent, CalendarEventKind};
pub use group_lesson::GroupLessonService;
pub use lesson::LessonService;
pub use manager::ManagerService;
pub use notification::NotificationService;
pub use package::PackageService;
pub use report::ReportService;
pub use student::StudentService;
pub use teacher::TeacherService;

use crate::api::ApiClient;
use crate::config::settings::Settings;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub api: ApiClient,
    pub auth_service: AuthService,
    pub student_service: StudentService,
    pub teacher_service: TeacherService,
    pub manager_service: ManagerService,
    pub lesson_service: LessonService,
    pub group_lesson_service: GroupLessonService,
    pub package_service: PackageService,
    pub notification_service: NotificationService,
    pub report_service: ReportService,
    pub calendar_service: CalendarService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings) -> Result<Self> {
        let api = ApiClient::new(&settings.api)?;
        Ok(Self::with_client(api, settings))
    }

    /// Build every service on top of an existing client
    pub fn with_client(api: ApiClient, settings: &Settings) -> Self {
        let validate = settings.features.client_validation;

        let lesson_service = LessonService::new(api.clone(), validate);
        let group_lesson_service = GroupLessonService::new(api.clone(), validate);

        Self {
            auth_service: AuthService::new(api.clone()),
            student_service: StudentService::new(api.clone(), validate),
            teacher_service: TeacherService::new(api.clone(), validate),
            manager_service: ManagerService::new(api.clone(), validate),
            calendar_service: CalendarService::new(lesson_service.clone(), group_lesson_service.clone()),
            lesson_service,
            group_lesson_service,
            package_service: PackageService::new(api.clone(), validate),
            notification_service: NotificationService::new(api.clone()),
            report_service: ReportService::new(api.clone()),
            api,
        }
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let authenticated = self.auth_service.is_authenticated().await;
        let api_reachable = if authenticated {
            self.auth_service.current_user().await.is_ok()
        } else {
            false
        };

        ServiceHealthStatus {
            authenticated,
            api_reachable,
        }
    }
}

/// Health status for the client session
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub authenticated: bool,
    pub api_reachable: bool,
}

impl ServiceHealthStatus {
    /// Check if the session can be used
    pub fn is_healthy(&self) -> bool {
        self.authenticated && self.api_reachable
    }

    /// Get list of problems
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.authenticated {
            issues.push("Not logged in".to_string());
        }
        if self.authenticated && !self.api_reachable {
            issues.push("API not reachable with current session".to_string());
        }

        issues
    }
}
