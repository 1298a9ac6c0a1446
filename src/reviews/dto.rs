use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::Review;

/// Request body for posting a review; the author comes from the token.
#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub text: String,
    pub rating: i64,
    pub place_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub text: String,
    pub rating: i64,
    pub user_id: Uuid,
    pub place_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.meta.id,
            text: review.text.clone(),
            rating: review.rating,
            user_id: review.user_id,
            place_id: review.place_id,
            created_at: review.meta.created_at,
            updated_at: review.meta.updated_at,
        }
    }
}
