use tracing::info;
use uuid::Uuid;

use super::Facade;
use crate::domain::{Amenity, FieldMap};
use crate::error::ApiError;

impl Facade {
    /// Create an amenity. Identity is the exact name string: creating a
    /// name that already exists returns the existing record instead of a
    /// duplicate.
    pub async fn create_amenity(&self, name: String) -> Result<Amenity, ApiError> {
        let amenity = self.get_or_create_amenity(&name).await?;
        info!(amenity_id = %amenity.meta.id, name = %amenity.name, "amenity resolved");
        Ok(amenity)
    }

    pub async fn get_amenity(&self, amenity_id: Uuid) -> Option<Amenity> {
        self.amenities.get(amenity_id).await
    }

    pub async fn list_amenities(&self) -> Vec<Amenity> {
        self.amenities.get_all().await
    }

    pub async fn update_amenity(
        &self,
        amenity_id: Uuid,
        fields: FieldMap,
    ) -> Result<Amenity, ApiError> {
        self.amenities
            .update_fields(amenity_id, &fields)
            .await?
            .ok_or(ApiError::NotFound("amenity"))
    }

    /// Dedup-or-create by logical name, shared with place creation/update.
    pub(super) async fn get_or_create_amenity(&self, name: &str) -> Result<Amenity, ApiError> {
        if let Some(existing) = self.amenities.find_first_by_attribute("name", name).await {
            return Ok(existing);
        }
        let amenity = Amenity::new(name.to_string())?;
        self.amenities.add(amenity.clone()).await?;
        Ok(amenity)
    }

    /// Resolve the amenity records a place references; dangling ids are
    /// skipped rather than treated as errors.
    pub(super) async fn amenities_of(&self, amenity_ids: &[Uuid]) -> Vec<Amenity> {
        let mut found = Vec::with_capacity(amenity_ids.len());
        for id in amenity_ids {
            if let Some(amenity) = self.amenities.get(*id).await {
                found.push(amenity);
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn create_is_dedup_by_exact_name() {
        let facade = Facade::new();
        let first = facade.create_amenity("WiFi".into()).await.unwrap();
        let second = facade.create_amenity("WiFi".into()).await.unwrap();
        assert_eq!(first.meta.id, second.meta.id);

        // different case is a different amenity
        let third = facade.create_amenity("wifi".into()).await.unwrap();
        assert_ne!(first.meta.id, third.meta.id);
        assert_eq!(facade.list_amenities().await.len(), 2);
    }

    #[tokio::test]
    async fn invalid_name_is_rejected() {
        let facade = Facade::new();
        assert!(matches!(
            facade.create_amenity("  ".into()).await.unwrap_err(),
            ApiError::Validation(_)
        ));
        assert!(facade.list_amenities().await.is_empty());
    }

    #[tokio::test]
    async fn update_missing_amenity_is_not_found() {
        let facade = Facade::new();
        let fields = json!({ "name": "Sauna" }).as_object().unwrap().clone();
        assert!(matches!(
            facade.update_amenity(Uuid::new_v4(), fields).await.unwrap_err(),
            ApiError::NotFound("amenity")
        ));
    }

    #[tokio::test]
    async fn rename_keeps_identity() {
        let facade = Facade::new();
        let amenity = facade.create_amenity("Pool".into()).await.unwrap();
        let fields = json!({ "name": "Heated pool" }).as_object().unwrap().clone();
        let renamed = facade.update_amenity(amenity.meta.id, fields).await.unwrap();
        assert_eq!(renamed.meta.id, amenity.meta.id);
        assert_eq!(renamed.name, "Heated pool");
    }
}
