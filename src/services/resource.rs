//! Generic REST resource wrapper
//!
//! Every CRUD entity of the backend follows the same shape
//! (`GET/POST {base}`, `GET/PUT/DELETE {base}/{id}`); the per-entity
//! services delegate to this and add their own validation and extras.

use std::marker::PhantomData;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;
use crate::api::ApiClient;
use crate::models::{ListQuery, Page};
use crate::utils::errors::{ApiError, LinguaDeskError, Result};

pub struct Resource<T> {
    api: ApiClient,
    base: &'static str,
    entity: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Resource<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            base: self.base,
            entity: self.entity,
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> Resource<T> {
    pub fn new(api: ApiClient, base: &'static str, entity: &'static str) -> Self {
        Self {
            api,
            base,
            entity,
            _marker: PhantomData,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn item_path(&self, id: i64) -> String {
        format!("{}/{}", self.base, id)
    }

    pub async fn list(&self, query: &ListQuery) -> Result<Page<T>> {
        debug!(entity = self.entity, query = ?query, "Listing");
        Ok(self.api.get_json(self.base, &query.to_pairs()).await?)
    }

    pub async fn get(&self, id: i64) -> Result<T> {
        debug!(entity = self.entity, id = id, "Fetching");
        self.api
            .get_json(&self.item_path(id), &[])
            .await
            .map_err(|e| self.not_found(id, e))
    }

    pub async fn create<B: Serialize>(&self, body: &B) -> Result<T> {
        Ok(self.api.post_json(self.base, body).await?)
    }

    pub async fn update<B: Serialize>(&self, id: i64, body: &B) -> Result<T> {
        self.api
            .put_json(&self.item_path(id), body)
            .await
            .map_err(|e| self.not_found(id, e))
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.api
            .delete(&self.item_path(id))
            .await
            .map_err(|e| self.not_found(id, e))
    }

    /// Translate a 404 into a typed not-found error
    pub fn not_found(&self, id: i64, e: ApiError) -> LinguaDeskError {
        match e {
            ApiError::Status { status: 404, .. } => LinguaDeskError::NotFound { entity: self.entity, id },
            other => other.into(),
        }
    }
}
