use uuid::Uuid;

use super::base::{as_i64, as_str, EntityMeta};
use super::FieldMap;
use crate::error::ApiError;
use crate::storage::StoredEntity;

/// User feedback on a place. `user_id` and `place_id` are fixed at
/// creation; only text and rating are mutable.
#[derive(Debug, Clone)]
pub struct Review {
    pub meta: EntityMeta,
    pub text: String,
    pub rating: i64,
    pub user_id: Uuid,
    pub place_id: Uuid,
}

fn validate_text(text: &str) -> Result<(), ApiError> {
    if text.trim().is_empty() {
        return Err(ApiError::Validation("review text must not be empty".into()));
    }
    Ok(())
}

fn validate_rating(rating: i64) -> Result<(), ApiError> {
    if !(1..=5).contains(&rating) {
        return Err(ApiError::Validation("rating must be between 1 and 5".into()));
    }
    Ok(())
}

impl Review {
    pub fn new(text: String, rating: i64, user_id: Uuid, place_id: Uuid) -> Result<Self, ApiError> {
        validate_text(&text)?;
        validate_rating(rating)?;
        Ok(Self {
            meta: EntityMeta::new(),
            text,
            rating,
            user_id,
            place_id,
        })
    }
}

impl StoredEntity for Review {
    fn id(&self) -> Uuid {
        self.meta.id
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "user_id" => Some(self.user_id.to_string()),
            "place_id" => Some(self.place_id.to_string()),
            _ => None,
        }
    }

    fn apply_fields(&mut self, fields: &FieldMap) -> Result<(), ApiError> {
        for (key, value) in fields {
            match key.as_str() {
                "text" => {
                    let v = as_str("text", value)?;
                    validate_text(&v)?;
                    self.text = v;
                }
                "rating" => {
                    let v = as_i64("rating", value)?;
                    validate_rating(v)?;
                    self.rating = v;
                }
                // user_id / place_id are immutable after creation
                _ => {}
            }
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.meta.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rating_bounds_are_inclusive() {
        let (u, p) = (Uuid::new_v4(), Uuid::new_v4());
        assert!(Review::new("fine".into(), 0, u, p).is_err());
        assert!(Review::new("fine".into(), 1, u, p).is_ok());
        assert!(Review::new("fine".into(), 5, u, p).is_ok());
        assert!(Review::new("fine".into(), 6, u, p).is_err());
    }

    #[test]
    fn text_must_be_non_empty() {
        assert!(Review::new("  ".into(), 3, Uuid::new_v4(), Uuid::new_v4()).is_err());
    }

    #[test]
    fn references_cannot_be_rewritten_by_update() {
        let user = Uuid::new_v4();
        let mut review = Review::new("ok".into(), 3, user, Uuid::new_v4()).unwrap();
        let fields = json!({ "user_id": Uuid::new_v4().to_string(), "rating": 4 });
        review.apply_fields(fields.as_object().unwrap()).unwrap();
        assert_eq!(review.user_id, user);
        assert_eq!(review.rating, 4);
    }

    #[test]
    fn float_rating_is_a_type_error() {
        let mut review = Review::new("ok".into(), 3, Uuid::new_v4(), Uuid::new_v4()).unwrap();
        let fields = json!({ "rating": 4.5 });
        let err = review.apply_fields(fields.as_object().unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "rating must be an integer");
    }
}
