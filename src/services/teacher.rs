//! Teacher service implementation
//!
//! CRUD over `/admin/teachers` plus the teacher's weekly availability
//! slots under `/teachers/{id}/availability`.

use tracing::{info, debug};
use crate::api::ApiClient;
use crate::models::{
    AvailabilitySlot, CreateAvailabilityRequest, CreateTeacherRequest, ListQuery, Page, Teacher,
    UpdateTeacherRequest,
};
use crate::utils::errors::{LinguaDeskError, Result};
use super::resource::Resource;

/// Teacher service for managing teachers and their availability
#[derive(Clone)]
pub struct TeacherService {
    resource: Resource<Teacher>,
    validate: bool,
}

impl TeacherService {
    /// Create a new TeacherService instance
    pub fn new(api: ApiClient, validate: bool) -> Self {
        Self {
            resource: Resource::new(api, "/admin/teachers", "Teacher"),
            validate,
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<Teacher>> {
        self.resource.list(query).await
    }

    /// Teachers able to teach `language`
    pub async fn list_by_language(&self, language: &str) -> Result<Vec<Teacher>> {
        let path = format!("/admin/teachers/language/{}", urlencoding::encode(language.trim()));
        debug!(language = language, "Listing teachers by language");
        Ok(self.resource.api().get_json(&path, &[]).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Teacher> {
        self.resource.get(id).await
    }

    pub async fn create(&self, request: &CreateTeacherRequest) -> Result<Teacher> {
        if self.validate {
            request.validate()?;
        }
        let teacher = self.resource.create(request).await?;
        info!(teacher_id = teacher.id, email = %teacher.email, "Teacher created");
        Ok(teacher)
    }

    pub async fn update(&self, id: i64, request: &UpdateTeacherRequest) -> Result<Teacher> {
        if self.validate {
            request.validate()?;
        }
        let teacher = self.resource.update(id, request).await?;
        info!(teacher_id = id, "Teacher updated");
        Ok(teacher)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.resource.delete(id).await?;
        info!(teacher_id = id, "Teacher deleted");
        Ok(())
    }

    pub async fn availability(&self, teacher_id: i64) -> Result<Vec<AvailabilitySlot>> {
        let path = format!("/teachers/{}/availability", teacher_id);
        self.resource
            .api()
            .get_json(&path, &[])
            .await
            .map_err(|e| self.resource.not_found(teacher_id, e))
    }

    /// Add a slot, refusing ones that overlap the teacher's existing slots
    pub async fn add_availability(&self, teacher_id: i64, request: &CreateAvailabilityRequest) -> Result<AvailabilitySlot> {
        request.validate()?;

        let existing = self.availability(teacher_id).await?;
        let candidate = AvailabilitySlot {
            id: 0,
            teacher_id,
            day_of_week: request.day_of_week,
            start_time: request.start_time,
            end_time: request.end_time,
            recurring: request.recurring,
        };
        if let Some(clash) = existing.iter().find(|slot| slot.overlaps(&candidate)) {
            return Err(LinguaDeskError::Validation(format!(
                "slot overlaps existing slot {} ({} {}-{})",
                clash.id, clash.day_of_week, clash.start_time, clash.end_time
            )));
        }

        let path = format!("/teachers/{}/availability", teacher_id);
        let slot: AvailabilitySlot = self.resource.api().post_json(&path, request).await?;
        info!(teacher_id = teacher_id, slot_id = slot.id, "Availability slot added");
        Ok(slot)
    }

    pub async fn remove_availability(&self, teacher_id: i64, slot_id: i64) -> Result<()> {
        let path = format!("/teachers/{}/availability/{}", teacher_id, slot_id);
        self.resource.api().delete(&path).await?;
        info!(teacher_id = teacher_id, slot_id = slot_id, "Availability slot removed");
        Ok(())
    }
}
