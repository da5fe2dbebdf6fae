//! Notification service implementation
//!
//! This service backs the notification panel: listing, unread counts,
//! marking read, deleting, and broadcasting announcements.

use reqwest::Method;
use tracing::{info, debug};
use crate::api::ApiClient;
use crate::models::notification::sort_for_panel;
use crate::models::{CreateNotificationRequest, Notification, NotificationStatus, UnreadCount};
use crate::utils::errors::Result;

/// Notification service for the current user's inbox
#[derive(Clone)]
pub struct NotificationService {
    api: ApiClient,
}

impl NotificationService {
    /// Create a new NotificationService instance
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Inbox sorted for display, optionally filtered by status
    pub async fn list(&self, status: Option<NotificationStatus>) -> Result<Vec<Notification>> {
        let query: Vec<(&str, String)> = status
            .map(|s| vec![("status", s.as_str().to_string())])
            .unwrap_or_default();

        let mut notifications: Vec<Notification> = self.api.get_json("/notifications", &query).await?;
        sort_for_panel(&mut notifications);
        debug!(count = notifications.len(), "Fetched notifications");
        Ok(notifications)
    }

    pub async fn unread_count(&self) -> Result<u64> {
        let count: UnreadCount = self.api.get_json("/notifications/unread-count", &[]).await?;
        Ok(count.count)
    }

    pub async fn mark_read(&self, id: i64) -> Result<()> {
        let path = format!("/notifications/{}/read", id);
        self.api.send_unit(Method::PATCH, &path, None).await?;
        debug!(notification_id = id, "Notification marked read");
        Ok(())
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        self.api.send_unit(Method::PATCH, "/notifications/read-all", None).await?;
        info!("All notifications marked read");
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api.delete(&format!("/notifications/{}", id)).await?;
        Ok(())
    }

    /// Send a notification to specific users or broadcast it
    pub async fn send(&self, request: &CreateNotificationRequest) -> Result<()> {
        request.validate()?;
        let body = serde_json::to_value(request)?;
        self.api.send_unit(Method::POST, "/notifications", Some(&body)).await?;
        info!(
            recipients = request.recipient_ids.len(),
            target_role = ?request.target_role,
            priority = ?request.priority,
            "Notification sent"
        );
        Ok(())
    }
}
