//! Lesson package (billing) service implementation

use chrono::Utc;
use tracing::info;
use crate::api::ApiClient;
use crate::models::{BillingSummary, CreatePackageRequest, LessonPackage, ListQuery, Page, UpdatePackageRequest};
use crate::utils::errors::Result;
use super::resource::Resource;

/// Package service for purchased lesson bundles
#[derive(Clone)]
pub struct PackageService {
    resource: Resource<LessonPackage>,
    validate: bool,
}

impl PackageService {
    /// Create a new PackageService instance
    pub fn new(api: ApiClient, validate: bool) -> Self {
        Self {
            resource: Resource::new(api, "/lesson-packages", "Lesson package"),
            validate,
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<LessonPackage>> {
        self.resource.list(query).await
    }

    pub async fn for_student(&self, student_id: i64) -> Result<Vec<LessonPackage>> {
        let path = format!("/lesson-packages/student/{}", student_id);
        Ok(self.resource.api().get_json(&path, &[]).await?)
    }

    pub async fn get(&self, id: i64) -> Result<LessonPackage> {
        self.resource.get(id).await
    }

    pub async fn create(&self, request: &CreatePackageRequest) -> Result<LessonPackage> {
        if self.validate {
            request.validate()?;
        }
        let package = self.resource.create(request).await?;
        info!(
            package_id = package.id,
            student_id = package.student_id,
            total_lessons = package.total_lessons,
            "Lesson package created"
        );
        Ok(package)
    }

    pub async fn update(&self, id: i64, request: &UpdatePackageRequest) -> Result<LessonPackage> {
        if self.validate {
            request.validate()?;
        }
        let package = self.resource.update(id, request).await?;
        info!(package_id = id, "Lesson package updated");
        Ok(package)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.resource.delete(id).await?;
        info!(package_id = id, "Lesson package deleted");
        Ok(())
    }

    /// Billing view for one student
    pub async fn billing_summary(&self, student_id: i64) -> Result<BillingSummary> {
        let packages = self.for_student(student_id).await?;
        Ok(BillingSummary::from_packages(student_id, &packages, Utc::now()))
    }
}
