use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateReviewRequest, ReviewResponse};
use crate::auth::extractors::AuthUser;
use crate::domain::FieldMap;
use crate::error::ApiError;
use crate::facade::NewReview;
use crate::state::AppState;

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/reviews", post(create_review).get(list_reviews))
        .route("/reviews/:id", get(get_review))
        .route("/reviews/:id", put(update_review))
        .route("/reviews/:id", delete(delete_review))
}

#[instrument(skip(state, payload))]
pub async fn create_review(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApiError> {
    let review = state
        .facade
        .create_review(
            &caller,
            NewReview {
                text: payload.text,
                rating: payload.rating,
                place_id: payload.place_id,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ReviewResponse::from(&review))))
}

#[instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = state.facade.list_reviews().await;
    Ok(Json(reviews.iter().map(ReviewResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review = state
        .facade
        .get_review(id)
        .await
        .ok_or(ApiError::NotFound("review"))?;
    Ok(Json(ReviewResponse::from(&review)))
}

#[instrument(skip(state, payload))]
pub async fn update_review(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FieldMap>,
) -> Result<Json<ReviewResponse>, ApiError> {
    let review = state.facade.update_review(&caller, id, payload).await?;
    Ok(Json(ReviewResponse::from(&review)))
}

#[instrument(skip(state))]
pub async fn delete_review(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.facade.delete_review(&caller, id).await?;
    Ok(Json(json!({ "message": "review deleted" })))
}
