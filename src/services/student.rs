//! Student service implementation
//!
//! Admin/manager CRUD over `/admin/students`.

use tracing::info;
use crate::api::ApiClient;
use crate::models::{CreateStudentRequest, ListQuery, Page, Student, UpdateStudentRequest};
use crate::utils::errors::Result;
use super::resource::Resource;

/// Student service for managing student records
#[derive(Clone)]
pub struct StudentService {
    resource: Resource<Student>,
    validate: bool,
}

impl StudentService {
    /// Create a new StudentService instance
    pub fn new(api: ApiClient, validate: bool) -> Self {
        Self {
            resource: Resource::new(api, "/admin/students", "Student"),
            validate,
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<Student>> {
        self.resource.list(query).await
    }

    pub async fn get(&self, id: i64) -> Result<Student> {
        self.resource.get(id).await
    }

    pub async fn create(&self, request: &CreateStudentRequest) -> Result<Student> {
        if self.validate {
            request.validate()?;
        }
        let student = self.resource.create(request).await?;
        info!(student_id = student.id, email = %student.email, "Student created");
        Ok(student)
    }

    pub async fn update(&self, id: i64, request: &UpdateStudentRequest) -> Result<Student> {
        if self.validate {
            request.validate()?;
        }
        let student = self.resource.update(id, request).await?;
        info!(student_id = id, "Student updated");
        Ok(student)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.resource.delete(id).await?;
        info!(student_id = id, "Student deleted");
        Ok(())
    }

    /// Soft-deactivate instead of deleting
    pub async fn set_active(&self, id: i64, active: bool) -> Result<Student> {
        let request = UpdateStudentRequest {
            active: Some(active),
            ..Default::default()
        };
        self.update(id, &request).await
    }
}
