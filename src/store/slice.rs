//! Entity slice: fetched items plus loading/error flags

use chrono::{DateTime, Utc};
use serde::Serialize;
use crate::models::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Slice<T> {
    pub items: Vec<T>,
    pub status: LoadStatus,
    pub error: Option<String>,
    pub last_fetched: Option<DateTime<Utc>>,
}

impl<T> Default for Slice<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            status: LoadStatus::Idle,
            error: None,
            last_fetched: None,
        }
    }
}

impl<T> Slice<T> {
    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    pub fn pending(&mut self) {
        self.status = LoadStatus::Loading;
        self.error = None;
    }

    /// Replace the items wholesale
    pub fn fulfilled(&mut self, items: Vec<T>) {
        self.items = items;
        self.status = LoadStatus::Succeeded;
        self.error = None;
        self.last_fetched = Some(Utc::now());
    }

    /// Keep the previous items, record the error
    pub fn rejected(&mut self, message: String) {
        self.status = LoadStatus::Failed;
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T: Entity> Slice<T> {
    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Replace the item with the same id, or append it
    pub fn upsert(&mut self, item: T) {
        match self.items.iter_mut().find(|existing| existing.id() == item.id()) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
    }

    pub fn remove(&mut self, id: i64) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }
}
