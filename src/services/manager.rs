//! Manager service implementation

use tracing::info;
use crate::api::ApiClient;
use crate::models::{CreateManagerRequest, ListQuery, Manager, Page, Student, UpdateManagerRequest};
use crate::utils::errors::Result;
use super::resource::Resource;

/// Manager service for managing manager accounts
#[derive(Clone)]
pub struct ManagerService {
    resource: Resource<Manager>,
    validate: bool,
}

impl ManagerService {
    /// Create a new ManagerService instance
    pub fn new(api: ApiClient, validate: bool) -> Self {
        Self {
            resource: Resource::new(api, "/managers", "Manager"),
            validate,
        }
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<Manager>> {
        self.resource.list(query).await
    }

    pub async fn get(&self, id: i64) -> Result<Manager> {
        self.resource.get(id).await
    }

    pub async fn create(&self, request: &CreateManagerRequest) -> Result<Manager> {
        if self.validate {
            request.validate()?;
        }
        let manager = self.resource.create(request).await?;
        info!(manager_id = manager.id, "Manager created");
        Ok(manager)
    }

    pub async fn update(&self, id: i64, request: &UpdateManagerRequest) -> Result<Manager> {
        let manager = self.resource.update(id, request).await?;
        info!(manager_id = id, "Manager updated");
        Ok(manager)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.resource.delete(id).await?;
        info!(manager_id = id, "Manager deleted");
        Ok(())
    }

    /// Students assigned to a manager
    pub async fn students(&self, manager_id: i64) -> Result<Vec<Student>> {
        let path = format!("{}/students", self.resource.item_path(manager_id));
        self.resource
            .api()
            .get_json(&path, &[])
            .await
            .map_err(|e| self.resource.not_found(manager_id, e))
    }
}
