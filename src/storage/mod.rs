mod memory;

pub use memory::InMemoryRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::FieldMap;
use crate::error::ApiError;

/// Capability every persisted entity provides: a stable id, string-typed
/// attribute access for lookups, allow-listed field-map updates, and a
/// modification-timestamp refresh.
pub trait StoredEntity: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;
    fn attribute(&self, name: &str) -> Option<String>;
    fn apply_fields(&mut self, fields: &FieldMap) -> Result<(), ApiError>;
    fn touch(&mut self);
}

/// CRUD plus attribute-equality lookup over one entity type. The in-memory
/// implementation is the only backend here; a relational one would plug in
/// at this seam.
#[async_trait]
pub trait Repository<T: StoredEntity>: Send + Sync {
    /// Store a new entity. Never overwrites an existing id.
    async fn add(&self, entity: T) -> Result<(), ApiError>;

    async fn get(&self, id: Uuid) -> Option<T>;

    /// All entities, oldest first.
    async fn get_all(&self) -> Vec<T>;

    /// Apply a field map to the entity with this id. Missing id is a no-op
    /// returning `None`, not an error. A failed validation persists nothing;
    /// a successful update always refreshes `updated_at`, even when the
    /// field map is empty.
    async fn update_fields(&self, id: Uuid, fields: &FieldMap) -> Result<Option<T>, ApiError>;

    /// Remove the entity with this id; `false` when it was absent.
    async fn delete(&self, id: Uuid) -> bool;

    /// First entity whose named attribute equals `value`.
    async fn find_first_by_attribute(&self, name: &str, value: &str) -> Option<T>;
}
