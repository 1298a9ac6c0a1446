use uuid::Uuid;

use super::base::{as_f64, as_str, as_uuid, EntityMeta};
use super::FieldMap;
use crate::error::ApiError;
use crate::storage::StoredEntity;

const TITLE_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 500;

/// A rental listing. `owner_id` is required and only the facade's
/// admin path may rewrite it; `amenity_ids` is kept deduplicated.
#[derive(Debug, Clone)]
pub struct Place {
    pub meta: EntityMeta,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub owner_id: Uuid,
    pub amenity_ids: Vec<Uuid>,
}

fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.chars().count() > TITLE_MAX {
        return Err(ApiError::Validation(format!(
            "title must be at most {TITLE_MAX} characters"
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ApiError> {
    if description.chars().count() > DESCRIPTION_MAX {
        return Err(ApiError::Validation(format!(
            "description must be at most {DESCRIPTION_MAX} characters"
        )));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), ApiError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(ApiError::Validation("price must be greater than 0".into()));
    }
    Ok(())
}

fn validate_latitude(latitude: f64) -> Result<(), ApiError> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(ApiError::Validation(
            "latitude must be between -90 and 90".into(),
        ));
    }
    Ok(())
}

fn validate_longitude(longitude: f64) -> Result<(), ApiError> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(ApiError::Validation(
            "longitude must be between -180 and 180".into(),
        ));
    }
    Ok(())
}

impl Place {
    pub fn new(
        title: String,
        description: String,
        price: f64,
        latitude: f64,
        longitude: f64,
        owner_id: Uuid,
    ) -> Result<Self, ApiError> {
        validate_title(&title)?;
        validate_description(&description)?;
        validate_price(price)?;
        validate_latitude(latitude)?;
        validate_longitude(longitude)?;
        Ok(Self {
            meta: EntityMeta::new(),
            title,
            description,
            price,
            latitude,
            longitude,
            owner_id,
            amenity_ids: Vec::new(),
        })
    }

    pub fn add_amenity(&mut self, amenity_id: Uuid) {
        if !self.amenity_ids.contains(&amenity_id) {
            self.amenity_ids.push(amenity_id);
        }
    }
}

impl StoredEntity for Place {
    fn id(&self) -> Uuid {
        self.meta.id
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "title" => Some(self.title.clone()),
            "owner_id" => Some(self.owner_id.to_string()),
            _ => None,
        }
    }

    // "amenities" arrives here as a list of resolved amenity ids; the
    // facade has already mapped names and created missing amenities.
    fn apply_fields(&mut self, fields: &FieldMap) -> Result<(), ApiError> {
        for (key, value) in fields {
            match key.as_str() {
                "title" => {
                    let v = as_str("title", value)?;
                    validate_title(&v)?;
                    self.title = v;
                }
                "description" => {
                    let v = as_str("description", value)?;
                    validate_description(&v)?;
                    self.description = v;
                }
                "price" => {
                    let v = as_f64("price", value)?;
                    validate_price(v)?;
                    self.price = v;
                }
                "latitude" => {
                    let v = as_f64("latitude", value)?;
                    validate_latitude(v)?;
                    self.latitude = v;
                }
                "longitude" => {
                    let v = as_f64("longitude", value)?;
                    validate_longitude(v)?;
                    self.longitude = v;
                }
                "owner_id" => self.owner_id = as_uuid("owner_id", value)?,
                "amenities" => {
                    let items = value.as_array().ok_or_else(|| {
                        ApiError::Validation("amenities must be a list".into())
                    })?;
                    self.amenity_ids.clear();
                    for item in items {
                        let id = as_uuid("amenities", item)?;
                        self.add_amenity(id);
                    }
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
