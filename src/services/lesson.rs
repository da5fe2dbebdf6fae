//! Lesson service implementation
//!
//! CRUD and status changes for individual lessons. The status transition
//! poller talks to the backend exclusively through `list_active` and
//! `update_status`.

use reqwest::Method;
use tracing::{info, debug};
use crate::api::ApiClient;
use crate::models::{
    CreateLessonRequest, Lesson, LessonFilter, LessonStatus, StatusUpdateRequest, UpdateLessonRequest,
};
use crate::utils::errors::{LinguaDeskError, Result};
use super::resource::Resource;

/// Lesson service for scheduling and status changes
#[derive(Clone)]
pub struct LessonService {
    resource: Resource<Lesson>,
    validate: bool,
}

impl LessonService {
    /// Create a new LessonService instance
    pub fn new(api: ApiClient, validate: bool) -> Self {
        Self {
            resource: Resource::new(api, "/lessons", "Lesson"),
            validate,
        }
    }

    pub async fn list(&self, filter: &LessonFilter) -> Result<Vec<Lesson>> {
        debug!(filter = ?filter, "Listing lessons");
        Ok(self.resource.api().get_json("/lessons", &filter.to_pairs()).await?)
    }

    /// Lessons the transition rules can still act on
    pub async fn list_active(&self) -> Result<Vec<Lesson>> {
        let mut lessons = Vec::new();
        for status in [LessonStatus::Scheduled, LessonStatus::Conducted] {
            let filter = LessonFilter {
                status: Some(status),
                ..Default::default()
            };
            lessons.extend(self.list(&filter).await?);
        }
        Ok(lessons)
    }

    pub async fn get(&self, id: i64) -> Result<Lesson> {
        self.resource.get(id).await
    }

    /// Schedule a lesson, refusing to double-book the teacher
    pub async fn create(&self, request: &CreateLessonRequest) -> Result<Lesson> {
        if self.validate {
            request.validate()?;
            self.ensure_teacher_free(request).await?;
        }
        let lesson = self.resource.create(request).await?;
        info!(
            lesson_id = lesson.id,
            teacher_id = lesson.teacher_id,
            student_id = lesson.student_id,
            start = %lesson.date_time,
            "Lesson scheduled"
        );
        Ok(lesson)
    }

    async fn ensure_teacher_free(&self, request: &CreateLessonRequest) -> Result<()> {
        let filter = LessonFilter {
            teacher_id: Some(request.teacher_id),
            ..LessonFilter::between(request.date_time - chrono::Duration::days(1), request.end())
        };
        let existing = self.list(&filter).await?;

        let clash = existing.iter().find(|lesson| {
            lesson.teacher_id == request.teacher_id
                && !matches!(lesson.status, LessonStatus::Cancelled | LessonStatus::Missed)
                && lesson.overlaps(request.date_time, request.end())
        });

        match clash {
            Some(lesson) => Err(LinguaDeskError::Validation(format!(
                "teacher {} already has lesson {} at {}",
                request.teacher_id, lesson.id, lesson.date_time
            ))),
            None => Ok(()),
        }
    }

    pub async fn update(&self, id: i64, request: &UpdateLessonRequest) -> Result<Lesson> {
        if self.validate {
            request.validate()?;
        }
        let lesson = self.resource.update(id, request).await?;
        info!(lesson_id = id, "Lesson updated");
        Ok(lesson)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.resource.delete(id).await?;
        info!(lesson_id = id, "Lesson deleted");
        Ok(())
    }

    /// Ask the backend to set a lesson's status, without client-side checks
    pub async fn update_status(&self, id: i64, status: LessonStatus) -> Result<Lesson> {
        let path = format!("{}/status", self.resource.item_path(id));
        self.resource
            .api()
            .patch_json(&path, &StatusUpdateRequest { status })
            .await
            .map_err(|e| self.resource.not_found(id, e))
    }

    /// User-initiated status change, checked against the allowed moves
    pub async fn change_status(&self, lesson: &Lesson, next: LessonStatus) -> Result<Lesson> {
        if !lesson.status.can_transition_to(next) {
            return Err(LinguaDeskError::InvalidStatusTransition {
                from: lesson.status.to_string(),
                to: next.to_string(),
            });
        }
        let updated = self.update_status(lesson.id, next).await?;
        info!(lesson_id = lesson.id, from = %lesson.status, to = %next, "Lesson status changed");
        Ok(updated)
    }

    /// Teacher confirms they will hold the lesson
    pub async fn confirm(&self, id: i64) -> Result<()> {
        let path = format!("{}/confirm", self.resource.item_path(id));
        self.resource
            .api()
            .send_unit(Method::POST, &path, None)
            .await
            .map_err(|e| self.resource.not_found(id, e))?;
        info!(lesson_id = id, "Lesson confirmed by teacher");
        Ok(())
    }
}
