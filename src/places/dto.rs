use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::amenities::dto::AmenityResponse;
use crate::domain::{Amenity, Place, User};
use crate::users::dto::UserResponse;

/// Request body for listing a place. `owner_id` is only honored for
/// admin callers; amenities are given by name.
#[derive(Debug, Deserialize)]
pub struct CreatePlaceRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: Option<Uuid>,
    #[serde(default)]
    pub amenities: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaceResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: Uuid,
    pub amenities: Vec<AmenityResponse>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl PlaceResponse {
    pub fn new(place: &Place, amenities: &[Amenity]) -> Self {
        Self {
            id: place.meta.id,
            title: place.title.clone(),
            description: place.description.clone(),
            price: place.price,
            latitude: place.latitude,
            longitude: place.longitude,
            owner_id: place.owner_id,
            amenities: amenities.iter().map(AmenityResponse::from).collect(),
            created_at: place.meta.created_at,
            updated_at: place.meta.updated_at,
        }
    }
}

/// Detail view joins the owner record onto the place.
#[derive(Debug, Serialize)]
pub struct PlaceDetailResponse {
    #[serde(flatten)]
    pub place: PlaceResponse,
    pub owner: UserResponse,
}

impl PlaceDetailResponse {
    pub fn new(place: &Place, owner: &User, amenities: &[Amenity]) -> Self {
        Self {
            place: PlaceResponse::new(place, amenities),
            owner: UserResponse::from(owner),
        }
    }
}
