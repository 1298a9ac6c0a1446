use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ApiError;

/// Shared identity and timestamp fields embedded by every entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMeta {
    pub id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl EntityMeta {
    pub fn new() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the modification timestamp. Called on every mutation,
    /// including an update that changed no domain field.
    pub fn touch(&mut self) {
        self.updated_at = OffsetDateTime::now_utc();
    }
}

impl Default for EntityMeta {
    fn default() -> Self {
        Self::new()
    }
}

// Coercion helpers for field-map updates. Type errors surface before any
// range check so a wrong-type input is never masked as out-of-range.

pub(crate) fn as_str(field: &str, value: &Value) -> Result<String, ApiError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| ApiError::Validation(format!("{field} must be a string")))
}

pub(crate) fn as_f64(field: &str, value: &Value) -> Result<f64, ApiError> {
    value
        .as_f64()
        .ok_or_else(|| ApiError::Validation(format!("{field} must be a number")))
}

pub(crate) fn as_i64(field: &str, value: &Value) -> Result<i64, ApiError> {
    value
        .as_i64()
        .ok_or_else(|| ApiError::Validation(format!("{field} must be an integer")))
}

pub(crate) fn as_bool(field: &str, value: &Value) -> Result<bool, ApiError> {
    value
        .as_bool()
        .ok_or_else(|| ApiError::Validation(format!("{field} must be a boolean")))
}

pub(crate) fn as_uuid(field: &str, value: &Value) -> Result<Uuid, ApiError> {
    let raw = as_str(field, value)?;
    raw.parse()
        .map_err(|_| ApiError::Validation(format!("{field} must be a valid id")))
}
