use super::base::{as_str, EntityMeta};
use super::FieldMap;
use crate::error::ApiError;
use crate::storage::StoredEntity;

const NAME_MAX: usize = 50;

/// A feature a place can offer ("WiFi", "Pool", ...). Logical identity is
/// the exact name string; the facade dedups on it.
#[derive(Debug, Clone)]
pub struct Amenity {
    pub meta: EntityMeta,
    pub name: String,
}

fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("amenity name must not be empty".into()));
    }
    if name.chars().count() > NAME_MAX {
        return Err(ApiError::Validation(format!(
            "amenity name must be at most {NAME_MAX} characters"
        )));
    }
    Ok(())
}

impl Amenity {
    pub fn new(name: String) -> Result<Self, ApiError> {
        validate_name(&name)?;
        Ok(Self {
            meta: EntityMeta::new(),
            name,
        })
    }
}

impl StoredEntity for Amenity {
    fn id(&self) -> uuid::Uuid {
        self.meta.id
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "name" => Some(self.name.clone()),
            _ => None,
        }
    }

    fn apply_fields(&mut self, fields: &FieldMap) -> Result<(), ApiError> {
        for (key, value) in fields {
            match key.as_str() {
                "name" => {
                    let v = as_str("name", value)?;
                    validate_name(&v)?;
                    self.name = v;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.meta.touch();
    }
}
