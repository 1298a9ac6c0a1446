use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::Facade;
use crate::domain::{Amenity, FieldMap, Place, User};
use crate::error::ApiError;
use crate::policy::{self, Identity};

/// Field set for listing a place. Amenities are given by name and
/// dedup-or-created; `owner_id` is only honored for admins.
#[derive(Debug)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: Option<Uuid>,
    pub amenities: Vec<String>,
}

impl Facade {
    pub async fn create_place(
        &self,
        caller: &Identity,
        new: NewPlace,
    ) -> Result<(Place, Vec<Amenity>), ApiError> {
        let owner_id = policy::resolve_place_owner(caller, new.owner_id)?;
        if self.users.get(owner_id).await.is_none() {
            return Err(ApiError::NotFound("owner"));
        }

        let mut place = Place::new(
            new.title,
            new.description,
            new.price,
            new.latitude,
            new.longitude,
            owner_id,
        )?;

        let mut resolved = Vec::with_capacity(new.amenities.len());
        for name in &new.amenities {
            let amenity = self.get_or_create_amenity(name).await?;
            place.add_amenity(amenity.meta.id);
            if !resolved.iter().any(|a: &Amenity| a.meta.id == amenity.meta.id) {
                resolved.push(amenity);
            }
        }

        self.places.add(place.clone()).await?;
        info!(place_id = %place.meta.id, owner_id = %owner_id, "place created");
        Ok((place, resolved))
    }

    pub async fn get_place(&self, place_id: Uuid) -> Option<(Place, User, Vec<Amenity>)> {
        let place = self.places.get(place_id).await?;
        let owner = self.users.get(place.owner_id).await?;
        let amenities = self.amenities_of(&place.amenity_ids).await;
        Some((place, owner, amenities))
    }

    pub async fn list_places(&self) -> Vec<(Place, Vec<Amenity>)> {
        let places = self.places.get_all().await;
        let mut out = Vec::with_capacity(places.len());
        for place in places {
            let amenities = self.amenities_of(&place.amenity_ids).await;
            out.push((place, amenities));
        }
        out
    }

    /// Partial update. Owner or admin only; an `owner_id` key from a
    /// non-admin is denied outright, and an `amenities` list is resolved
    /// (id, then name, then created) before the single atomic write.
    pub async fn update_place(
        &self,
        caller: &Identity,
        place_id: Uuid,
        mut fields: FieldMap,
    ) -> Result<(Place, Vec<Amenity>), ApiError> {
        policy::ensure_may_change_owner(caller, fields.contains_key("owner_id"))?;

        let place = self
            .places
            .get(place_id)
            .await
            .ok_or(ApiError::NotFound("place"))?;
        policy::ensure_place_editable(caller, place.owner_id)?;

        if let Some(value) = fields.get("owner_id") {
            let new_owner = crate::domain::base::as_uuid("owner_id", value)?;
            if self.users.get(new_owner).await.is_none() {
                return Err(ApiError::NotFound("owner"));
            }
        }

        if let Some(value) = fields.remove("amenities") {
            let identifiers = value
                .as_array()
                .ok_or_else(|| ApiError::Validation("amenities must be a list".into()))?;
            let mut ids = Vec::with_capacity(identifiers.len());
            for identifier in identifiers {
                let raw = identifier.as_str().ok_or_else(|| {
                    ApiError::Validation("amenities entries must be strings".into())
                })?;
                let amenity = self.resolve_amenity_identifier(raw).await?;
                ids.push(Value::String(amenity.meta.id.to_string()));
            }
            fields.insert("amenities".into(), Value::Array(ids));
        }

        let updated = self
            .places
            .update_fields(place_id, &fields)
            .await?
            .ok_or(ApiError::NotFound("place"))?;
        let amenities = self.amenities_of(&updated.amenity_ids).await;
        Ok((updated, amenities))
    }

    // An amenity reference in an update may be an existing id, an existing
    // name, or a brand-new name.
    async fn resolve_amenity_identifier(&self, identifier: &str) -> Result<Amenity, ApiError> {
        if let Ok(id) = identifier.parse::<Uuid>() {
            if let Some(amenity) = self.amenities.get(id).await {
                return Ok(amenity);
            }
        }
        self.get_or_create_amenity(identifier).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{listed_place, registered_user};
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> FieldMap {
        value.as_object().unwrap().clone()
    }

    fn new_place(owner_id: Option<Uuid>) -> NewPlace {
        NewPlace {
            title: "Cabin".into(),
            description: "In the woods".into(),
            price: 60.0,
            latitude: 45.0,
            longitude: 6.0,
            owner_id,
            amenities: vec![],
        }
    }

    #[tokio::test]
    async fn owner_defaults_to_caller() {
        let facade = Facade::new();
        let caller = registered_user(&facade, "a@example.com", false).await;
        let (place, _) = facade.create_place(&caller, new_place(None)).await.unwrap();
        assert_eq!(place.owner_id, caller.user_id);
    }

    #[tokio::test]
    async fn non_admin_cannot_name_another_owner() {
        let facade = Facade::new();
        let caller = registered_user(&facade, "a@example.com", false).await;
        let other = registered_user(&facade, "b@example.com", false).await;
        let err = facade
            .create_place(&caller, new_place(Some(other.user_id)))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert!(facade.list_places().await.is_empty());
    }

    #[tokio::test]
    async fn admin_can_create_for_someone_else_if_they_exist() {
        let facade = Facade::new();
        let admin = registered_user(&facade, "root@example.com", true).await;
        let owner = registered_user(&facade, "o@example.com", false).await;

        let (place, _) = facade
            .create_place(&admin, new_place(Some(owner.user_id)))
            .await
            .unwrap();
        assert_eq!(place.owner_id, owner.user_id);

        let err = facade
            .create_place(&admin, new_place(Some(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("owner")));
    }

    #[tokio::test]
    async fn validation_failure_persists_nothing() {
        let facade = Facade::new();
        let caller = registered_user(&facade, "a@example.com", false).await;
        let mut bad = new_place(None);
        bad.price = 0.0;
        assert!(facade.create_place(&caller, bad).await.is_err());
        assert!(facade.list_places().await.is_empty());
    }

    #[tokio::test]
    async fn amenities_are_deduped_by_name_across_places() {
        let facade = Facade::new();
        let caller = registered_user(&facade, "a@example.com", false).await;
        let first = listed_place(&facade, &caller, &["wifi", "wifi", "pool"]).await;
        assert_eq!(first.amenity_ids.len(), 2);

        let second = listed_place(&facade, &caller, &["wifi"]).await;
        assert_eq!(second.amenity_ids[0], first.amenity_ids[0]);
        assert_eq!(facade.list_amenities().await.len(), 2);
    }

    #[tokio::test]
    async fn owner_change_scenario() {
        let facade = Facade::new();
        let owner = registered_user(&facade, "a@example.com", false).await;
        let place = listed_place(&facade, &owner, &["wifi"]).await;
        let intruder = registered_user(&facade, "b@example.com", false).await;

        // B may not grab ownership
        let err = facade
            .update_place(
                &intruder,
                place.meta.id,
                fields(json!({ "owner_id": intruder.user_id.to_string() })),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        // B may not edit at all
        let err = facade
            .update_place(&intruder, place.meta.id, fields(json!({ "price": 10.0 })))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        // A updates the price; amenities stay untouched
        let (updated, amenities) = facade
            .update_place(&owner, place.meta.id, fields(json!({ "price": 50.0 })))
            .await
            .unwrap();
        assert_eq!(updated.price, 50.0);
        assert_eq!(updated.amenity_ids, place.amenity_ids);
        assert_eq!(amenities.len(), 1);

        // an admin may transfer ownership
        let admin = registered_user(&facade, "root@example.com", true).await;
        let (transferred, _) = facade
            .update_place(
                &admin,
                place.meta.id,
                fields(json!({ "owner_id": intruder.user_id.to_string() })),
            )
            .await
            .unwrap();
        assert_eq!(transferred.owner_id, intruder.user_id);
    }

    #[tokio::test]
    async fn amenity_update_accepts_ids_and_names() {
        let facade = Facade::new();
        let owner = registered_user(&facade, "a@example.com", false).await;
        let place = listed_place(&facade, &owner, &["wifi"]).await;
        let wifi_id = place.amenity_ids[0];

        let (updated, amenities) = facade
            .update_place(
                &owner,
                place.meta.id,
                fields(json!({ "amenities": [wifi_id.to_string(), "sauna"] })),
            )
            .await
            .unwrap();
        assert_eq!(updated.amenity_ids.len(), 2);
        assert_eq!(updated.amenity_ids[0], wifi_id);
        assert!(amenities.iter().any(|a| a.name == "sauna"));
    }

    #[tokio::test]
    async fn failed_place_update_leaves_record_unchanged() {
        let facade = Facade::new();
        let owner = registered_user(&facade, "a@example.com", false).await;
        let place = listed_place(&facade, &owner, &[]).await;

        let err = facade
            .update_place(
                &owner,
                place.meta.id,
                fields(json!({ "price": 99.0, "latitude": 123.0 })),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));

        let (unchanged, _, _) = facade.get_place(place.meta.id).await.unwrap();
        assert_eq!(unchanged.price, place.price);
        assert_eq!(unchanged.latitude, place.latitude);
    }

    #[tokio::test]
    async fn missing_place_is_not_found() {
        let facade = Facade::new();
        let caller = registered_user(&facade, "a@example.com", false).await;
        let err = facade
            .update_place(&caller, Uuid::new_v4(), FieldMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound("place")));
        assert!(facade.get_place(Uuid::new_v4()).await.is_none());
    }
}
