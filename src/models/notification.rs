//! Notification model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::models::common::Entity;
use crate::utils::errors::{LinguaDeskError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Lesson,
    Payment,
    System,
    Reminder,
    Announcement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Unread,
    Read,
    Archived,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Unread => "UNREAD",
            NotificationStatus::Read => "READ",
            NotificationStatus::Archived => "ARCHIVED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub recipient_id: i64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
}

impl Entity for Notification {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.status == NotificationStatus::Unread
    }
}

/// Sort for a notification panel: unread first, then priority, then newest
pub fn sort_for_panel(notifications: &mut [Notification]) {
    notifications.sort_by(|a, b| {
        b.is_unread()
            .cmp(&a.is_unread())
            .then(b.priority.cmp(&a.priority))
            .then(b.created_at.cmp(&a.created_at))
    });
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNotificationRequest {
    /// Empty means broadcast to every user of `target_role` (or everyone)
    pub recipient_ids: Vec<i64>,
    pub target_role: Option<crate::models::Role>,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub priority: NotificationPriority,
}

impl CreateNotificationRequest {
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.message.trim().is_empty() {
            return Err(LinguaDeskError::Validation("notification title and message are required".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnreadCount {
    pub count: u64,
}
