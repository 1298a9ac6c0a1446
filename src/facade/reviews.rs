use tracing::info;
use uuid::Uuid;

use super::Facade;
use crate::domain::{FieldMap, Review};
use crate::error::ApiError;
use crate::policy::{self, Identity};

/// Field set for posting a review; the author is always the caller.
#[derive(Debug)]
pub struct NewReview {
    pub text: String,
    pub rating: i64,
    pub place_id: Uuid,
}

impl Facade {
    /// Post a review. Owners may not review their own place and a caller
    /// gets at most one review per place.
    pub async fn create_review(
        &self,
        caller: &Identity,
        new: NewReview,
    ) -> Result<Review, ApiError> {
        let place = self
            .places
            .get(new.place_id)
            .await
            .ok_or(ApiError::NotFound("place"))?;
        policy::ensure_not_place_owner(caller, place.owner_id)?;

        if self
            .review_by_user_and_place(caller.user_id, new.place_id)
            .await
            .is_some()
        {
            return Err(ApiError::Conflict(
                "you have already reviewed this place".into(),
            ));
        }

        let review = Review::new(new.text, new.rating, caller.user_id, new.place_id)?;
        self.reviews.add(review.clone()).await?;
        info!(review_id = %review.meta.id, place_id = %new.place_id, "review created");
        Ok(review)
    }

    pub async fn get_review(&self, review_id: Uuid) -> Option<Review> {
        self.reviews.get(review_id).await
    }

    pub async fn list_reviews(&self) -> Vec<Review> {
        self.reviews.get_all().await
    }

    /// All reviews of one place; the place must exist.
    pub async fn reviews_for_place(&self, place_id: Uuid) -> Result<Vec<Review>, ApiError> {
        if self.places.get(place_id).await.is_none() {
            return Err(ApiError::NotFound("place"));
        }
        Ok(self
            .reviews
            .get_all()
            .await
            .into_iter()
            .filter(|review| review.place_id == place_id)
            .collect())
    }

    /// Uniqueness probe for the one-review-per-(user, place) rule.
    pub async fn review_by_user_and_place(&self, user_id: Uuid, place_id: Uuid) -> Option<Review> {
        self.reviews
            .get_all()
            .await
            .into_iter()
            .find(|review| review.user_id == user_id && review.place_id == place_id)
    }

    /// Author-only; admins get no override here.
    pub async fn update_review(
        &self,
        caller: &Identity,
        review_id: Uuid,
        fields: FieldMap,
    ) -> Result<Review, ApiError> {
        let review = self
            .reviews
            .get(review_id)
            .await
            .ok_or(ApiError::NotFound("review"))?;
        policy::ensure_review_author(caller, review.user_id)?;

        self.reviews
            .update_fields(review_id, &fields)
            .await?
            .ok_or(ApiError::NotFound("review"))
    }

    /// Author-only deletion; no cascade beyond the review itself.
    pub async fn delete_review(&self, caller: &Identity, review_id: Uuid) -> Result<(), ApiError> {
        let review = self
            .reviews
            .get(review_id)
            .await
            .ok_or(ApiError::NotFound("review"))?;
        policy::ensure_review_author(caller, review.user_id)?;

        if !self.reviews.delete(review_id).await {
            return Err(ApiError::NotFound("review"));
        }
        info!(review_id = %review_id, "review deleted");
        Ok(())
    }
}
