//! Data models module
//!
//! Plain records mirrored from the school backend. The backend owns them;
//! the client only holds refetchable copies.

pub mod common;
pub mod user;
pub mod student;
pub mod teacher;
pub mod manager;
pub mod lesson;
pub mod group_lesson;
pub mod package;
pub mod notification;
pub mod report;

// Re-export commonly used models
pub use common::{Entity, Page, ListQuery};
pub use user::{Role, User, LoginRequest, LoginOutcome, LoginResponse, MfaVerifyRequest, RefreshRequest, Session, TokenPair};
pub use student::{Student, CreateStudentRequest, UpdateStudentRequest};
pub use teacher::{Teacher, AvailabilitySlot, CreateTeacherRequest, UpdateTeacherRequest, CreateAvailabilityRequest};
pub use manager::{Manager, CreateManagerRequest, UpdateManagerRequest};
pub use lesson::{Lesson, LessonStatus, LessonFilter, CreateLessonRequest, UpdateLessonRequest, StatusUpdateRequest};
pub use group_lesson::{GroupLesson, GroupLessonStatus, CreateGroupLessonRequest, UpdateGroupLessonRequest};
pub use package::{LessonPackage, BillingSummary, CreatePackageRequest, UpdatePackageRequest};
pub use notification::{Notification, NotificationType, NotificationPriority, NotificationStatus, CreateNotificationRequest, UnreadCount};
pub use report::{ExportRequest, ExportFormat, ReportType};
