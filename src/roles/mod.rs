//! Role-based dispatch
//!
//! Each `Role` indexes three static tables: the dashboard sections it sees,
//! the routes it may navigate to and the actions it may perform.

pub mod dashboard;

pub use dashboard::{Dashboard, DashboardSummary};

use serde::{Deserialize, Serialize};
use crate::models::Role;
use crate::utils::errors::{LinguaDeskError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardSection {
    Overview,
    Students,
    Teachers,
    Managers,
    Lessons,
    GroupLessons,
    Packages,
    Notifications,
    Reports,
    MyLessons,
    MyPackages,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Dashboard,
    Students,
    Teachers,
    Managers,
    Lessons,
    GroupLessons,
    Calendar,
    Availability,
    Packages,
    Notifications,
    Reports,
    Profile,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/dashboard",
            Route::Students => "/students",
            Route::Teachers => "/teachers",
            Route::Managers => "/managers",
            Route::Lessons => "/lessons",
            Route::GroupLessons => "/group-lessons",
            Route::Calendar => "/calendar",
            Route::Availability => "/availability",
            Route::Packages => "/packages",
            Route::Notifications => "/notifications",
            Route::Reports => "/reports",
            Route::Profile => "/profile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ManageStudents,
    ManageTeachers,
    ManageManagers,
    ScheduleLessons,
    ChangeLessonStatus,
    ConfirmLessons,
    ManageGroupLessons,
    RegisterForGroupLessons,
    ManageAvailability,
    ManagePackages,
    SendNotifications,
    ExportReports,
}

impl Action {
    pub const ALL: [Action; 12] = [
        Action::ManageStudents,
        Action::ManageTeachers,
        Action::ManageManagers,
        Action::ScheduleLessons,
        Action::ChangeLessonStatus,
        Action::ConfirmLessons,
        Action::ManageGroupLessons,
        Action::RegisterForGroupLessons,
        Action::ManageAvailability,
        Action::ManagePackages,
        Action::SendNotifications,
        Action::ExportReports,
    ];

    /// Create/update/delete of a backend entity
    pub fn is_crud(&self) -> bool {
        !matches!(self, Action::RegisterForGroupLessons | Action::ConfirmLessons)
    }
}

const ADMIN_SECTIONS: &[DashboardSection] = &[
    DashboardSection::Overview,
    DashboardSection::Students,
    DashboardSection::Teachers,
    DashboardSection::Managers,
    DashboardSection::Lessons,
    DashboardSection::GroupLessons,
    DashboardSection::Packages,
    DashboardSection::Notifications,
    DashboardSection::Reports,
];

const MANAGER_SECTIONS: &[DashboardSection] = &[
    DashboardSection::Overview,
    DashboardSection::Students,
    DashboardSection::Lessons,
    DashboardSection::GroupLessons,
    DashboardSection::Packages,
    DashboardSection::Notifications,
];

const TEACHER_SECTIONS: &[DashboardSection] = &[
    DashboardSection::MyLessons,
    DashboardSection::GroupLessons,
    DashboardSection::Notifications,
];

const STUDENT_SECTIONS: &[DashboardSection] = &[
    DashboardSection::MyLessons,
    DashboardSection::MyPackages,
    DashboardSection::GroupLessons,
    DashboardSection::Notifications,
];

const ADMIN_ROUTES: &[Route] = &[
    Route::Dashboard,
    Route::Students,
    Route::Teachers,
    Route::Managers,
    Route::Lessons,
    Route::GroupLessons,
    Route::Calendar,
    Route::Availability,
    Route::Packages,
    Route::Notifications,
    Route::Reports,
    Route::Profile,
];

const MANAGER_ROUTES: &[Route] = &[
    Route::Dashboard,
    Route::Students,
    Route::Teachers,
    Route::Lessons,
    Route::GroupLessons,
    Route::Calendar,
    Route::Packages,
    Route::Notifications,
    Route::Reports,
    Route::Profile,
];

const TEACHER_ROUTES: &[Route] = &[
    Route::Dashboard,
    Route::Lessons,
    Route::GroupLessons,
    Route::Calendar,
    Route::Availability,
    Route::Notifications,
    Route::Profile,
];

const STUDENT_ROUTES: &[Route] = &[
    Route::Dashboard,
    Route::Lessons,
    Route::GroupLessons,
    Route::Calendar,
    Route::Packages,
    Route::Notifications,
    Route::Profile,
];

const ADMIN_ACTIONS: &[Action] = &Action::ALL;

const MANAGER_ACTIONS: &[Action] = &[
    Action::ManageStudents,
    Action::ScheduleLessons,
    Action::ChangeLessonStatus,
    Action::ManageGroupLessons,
    Action::ManagePackages,
    Action::SendNotifications,
    Action::ExportReports,
];

const TEACHER_ACTIONS: &[Action] = &[
    Action::ChangeLessonStatus,
    Action::ConfirmLessons,
    Action::ManageAvailability,
];

const STUDENT_ACTIONS: &[Action] = &[Action::RegisterForGroupLessons];

impl Role {
    pub fn dashboard_sections(&self) -> &'static [DashboardSection] {
        match self {
            Role::Admin => ADMIN_SECTIONS,
            Role::Manager => MANAGER_SECTIONS,
            Role::Teacher => TEACHER_SECTIONS,
            Role::Student => STUDENT_SECTIONS,
        }
    }

    pub fn allowed_routes(&self) -> &'static [Route] {
        match self {
            Role::Admin => ADMIN_ROUTES,
            Role::Manager => MANAGER_ROUTES,
            Role::Teacher => TEACHER_ROUTES,
            Role::Student => STUDENT_ROUTES,
        }
    }

    pub fn permitted_actions(&self) -> &'static [Action] {
        match self {
            Role::Admin => ADMIN_ACTIONS,
            Role::Manager => MANAGER_ACTIONS,
            Role::Teacher => TEACHER_ACTIONS,
            Role::Student => STUDENT_ACTIONS,
        }
    }

    pub fn can(&self, action: Action) -> bool {
        self.permitted_actions().contains(&action)
    }

    pub fn can_access(&self, route: Route) -> bool {
        self.allowed_routes().contains(&route)
    }

    /// Where a freshly signed-in user lands
    pub fn home_route(&self) -> Route {
        Route::Dashboard
    }
}

/// Gate an action, producing `PermissionDenied` when the role lacks it
pub fn require(role: Role, action: Action) -> Result<()> {
    if role.can(action) {
        Ok(())
    } else {
        Err(LinguaDeskError::PermissionDenied(format!("{} may not {:?}", role, action)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_admin_can_do_everything() {
        for action in Action::ALL {
            assert!(Role::Admin.can(action), "{:?}", action);
        }
    }

    #[test]
    fn test_student_has_no_crud() {
        for action in Action::ALL.into_iter().filter(Action::is_crud) {
            assert!(!Role::Student.can(action), "{:?}", action);
        }
        assert!(Role::Student.can(Action::RegisterForGroupLessons));
    }

    #[test]
    fn test_teacher_permissions() {
        assert!(Role::Teacher.can(Action::ConfirmLessons));
        assert!(Role::Teacher.can(Action::ManageAvailability));
        assert!(!Role::Teacher.can(Action::ManageStudents));
        assert!(!Role::Teacher.can_access(Route::Reports));
    }

    #[test]
    fn test_every_role_reaches_dashboard() {
        for role in Role::ALL {
            assert!(role.can_access(role.home_route()));
            assert!(!role.dashboard_sections().is_empty());
        }
    }

    #[test]
    fn test_managers_route_is_admin_only() {
        let allowed: Vec<Role> = Role::ALL.into_iter().filter(|r| r.can_access(Route::Managers)).collect();
        assert_eq!(allowed, vec![Role::Admin]);
    }

    #[test]
    fn test_require() {
        assert!(require(Role::Manager, Action::ExportReports).is_ok());
        assert_matches!(
            require(Role::Student, Action::ExportReports),
            Err(LinguaDeskError::PermissionDenied(_))
        );
    }

    #[test]
    fn test_unknown_role_fails_to_parse() {
        assert!("JANITOR".parse::<Role>().is_err());
        assert_eq!("role_teacher".parse::<Role>().unwrap(), Role::Teacher);
    }
}
