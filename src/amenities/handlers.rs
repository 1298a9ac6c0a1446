use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{AmenityResponse, CreateAmenityRequest};
use crate::auth::extractors::AuthUser;
use crate::domain::FieldMap;
use crate::error::ApiError;
use crate::state::AppState;

pub fn amenity_routes() -> Router<AppState> {
    Router::new()
        .route("/amenities", post(create_amenity).get(list_amenities))
        .route("/amenities/:id", get(get_amenity))
        .route("/amenities/:id", put(update_amenity))
}

#[instrument(skip(state, payload))]
pub async fn create_amenity(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Json(payload): Json<CreateAmenityRequest>,
) -> Result<(StatusCode, Json<AmenityResponse>), ApiError> {
    let amenity = state.facade.create_amenity(payload.name).await?;
    Ok((StatusCode::CREATED, Json(AmenityResponse::from(&amenity))))
}

#[instrument(skip(state))]
pub async fn list_amenities(
    State(state): State<AppState>,
) -> Result<Json<Vec<AmenityResponse>>, ApiError> {
    let amenities = state.facade.list_amenities().await;
    Ok(Json(amenities.iter().map(AmenityResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_amenity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AmenityResponse>, ApiError> {
    let amenity = state
        .facade
        .get_amenity(id)
        .await
        .ok_or(ApiError::NotFound("amenity"))?;
    Ok(Json(AmenityResponse::from(&amenity)))
}

#[instrument(skip(state, payload))]
pub async fn update_amenity(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FieldMap>,
) -> Result<Json<AmenityResponse>, ApiError> {
    let amenity = state.facade.update_amenity(id, payload).await?;
    Ok(Json(AmenityResponse::from(&amenity)))
}
