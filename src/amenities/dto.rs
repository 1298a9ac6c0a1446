use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::Amenity;

#[derive(Debug, Deserialize)]
pub struct CreateAmenityRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct AmenityResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&Amenity> for AmenityResponse {
    fn from(amenity: &Amenity) -> Self {
        Self {
            id: amenity.meta.id,
            name: amenity.name.clone(),
            created_at: amenity.meta.created_at,
            updated_at: amenity.meta.updated_at,
        }
    }
}
