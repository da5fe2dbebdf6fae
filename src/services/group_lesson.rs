//! Group lesson service implementation

use reqwest::Method;
use tracing::info;
use crate::api::ApiClient;
use crate::models::{
    CreateGroupLessonRequest, GroupLesson, GroupLessonStatus, ListQuery, Page, StatusUpdateRequest,
    UpdateGroupLessonRequest,
};
use crate::utils::errors::{LinguaDeskError, Result};
use super::resource::Resource;

/// Group lesson service for multi-student sessions
#[derive(Clone)]
pub struct GroupLessonService {
    resource: Resource<GroupLesson>,
    validate: bool,
}

impl GroupLessonService {
    /// Create a new GroupLessonService instance
    pub fn new(api: ApiClient, validate: bool) -> Self {
        Self {
            resource: Resource::new(api, "/group-lessons", "Group lesson"),
            validate,
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<GroupLesson>> {
        self.resource.list(query).await
    }

    pub async fn get(&self, id: i64) -> Result<GroupLesson> {
        self.resource.get(id).await
    }

    pub async fn create(&self, request: &CreateGroupLessonRequest) -> Result<GroupLesson> {
        if self.validate {
            request.validate()?;
        }
        let group = self.resource.create(request).await?;
        info!(group_lesson_id = group.id, title = %group.title, "Group lesson created");
        Ok(group)
    }

    pub async fn update(&self, id: i64, request: &UpdateGroupLessonRequest) -> Result<GroupLesson> {
        if self.validate {
            if let Some(max) = request.max_students {
                let current = self.get(id).await?;
                if (max as usize) < current.student_ids.len() {
                    return Err(LinguaDeskError::Validation(format!(
                        "capacity {} is below the {} registered students",
                        max,
                        current.student_ids.len()
                    )));
                }
            }
        }
        let group = self.resource.update(id, request).await?;
        info!(group_lesson_id = id, "Group lesson updated");
        Ok(group)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.resource.delete(id).await?;
        info!(group_lesson_id = id, "Group lesson deleted");
        Ok(())
    }

    /// Register a student, pre-checking capacity and status
    pub async fn register_student(&self, group: &GroupLesson, student_id: i64) -> Result<()> {
        if self.validate {
            group.check_can_register(student_id)?;
        }
        let path = format!("{}/students/{}", self.resource.item_path(group.id), student_id);
        self.resource.api().send_unit(Method::POST, &path, None).await?;
        info!(group_lesson_id = group.id, student_id = student_id, "Student registered for group lesson");
        Ok(())
    }

    pub async fn unregister_student(&self, group_id: i64, student_id: i64) -> Result<()> {
        let path = format!("{}/students/{}", self.resource.item_path(group_id), student_id);
        self.resource.api().delete(&path).await?;
        info!(group_lesson_id = group_id, student_id = student_id, "Student removed from group lesson");
        Ok(())
    }

    pub async fn update_status(&self, id: i64, status: GroupLessonStatus) -> Result<GroupLesson> {
        let path = format!("{}/status", self.resource.item_path(id));
        let group = self
            .resource
            .api()
            .patch_json(&path, &StatusUpdateRequest { status })
            .await
            .map_err(|e| self.resource.not_found(id, e))?;
        info!(group_lesson_id = id, status = %status, "Group lesson status changed");
        Ok(group)
    }
}
