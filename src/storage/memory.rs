use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Repository, StoredEntity};
use crate::domain::FieldMap;
use crate::error::ApiError;

/// Backing-store implementation over a guarded map. Updates go through a
/// clone–validate–swap cycle so a failing field map never leaves a partial
/// write behind.
pub struct InMemoryRepository<T: StoredEntity> {
    inner: RwLock<Table<T>>,
}

struct Table<T> {
    rows: HashMap<Uuid, T>,
    // insertion order, so listings are stable
    order: Vec<Uuid>,
}

impl<T: StoredEntity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Table {
                rows: HashMap::new(),
                order: Vec::new(),
            }),
        }
    }
}

impl<T: StoredEntity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: StoredEntity> Repository<T> for InMemoryRepository<T> {
    async fn add(&self, entity: T) -> Result<(), ApiError> {
        let mut table = self.inner.write().await;
        let id = entity.id();
        if table.rows.contains_key(&id) {
            return Err(ApiError::Conflict(format!("id {id} already exists")));
        }
        table.rows.insert(id, entity);
        table.order.push(id);
        Ok(())
    }

    async fn get(&self, id: Uuid) -> Option<T> {
        self.inner.read().await.rows.get(&id).cloned()
    }

    async fn get_all(&self) -> Vec<T> {
        let table = self.inner.read().await;
        table
            .order
            .iter()
            .filter_map(|id| table.rows.get(id).cloned())
            .collect()
    }

    async fn update_fields(&self, id: Uuid, fields: &FieldMap) -> Result<Option<T>, ApiError> {
        let mut table = self.inner.write().await;
        let Some(current) = table.rows.get(&id) else {
            return Ok(None);
        };
        let mut updated = current.clone();
        updated.apply_fields(fields)?;
        updated.touch();
        table.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: Uuid) -> bool {
        let mut table = self.inner.write().await;
        if table.rows.remove(&id).is_some() {
            table.order.retain(|other| *other != id);
            true
        } else {
            false
        }
    }

    async fn find_first_by_attribute(&self, name: &str, value: &str) -> Option<T> {
        let table = self.inner.read().await;
        table
            .order
            .iter()
            .filter_map(|id| table.rows.get(id))
            .find(|entity| entity.attribute(name).as_deref() == Some(value))
            .cloned()
    }
}
