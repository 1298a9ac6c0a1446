use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreatePlaceRequest, PlaceDetailResponse, PlaceResponse};
use crate::auth::extractors::AuthUser;
use crate::domain::FieldMap;
use crate::error::ApiError;
use crate::facade::NewPlace;
use crate::reviews::dto::ReviewResponse;
use crate::state::AppState;

pub fn place_routes() -> Router<AppState> {
    Router::new()
        .route("/places", post(create_place).get(list_places))
        .route("/places/:id", get(get_place).put(update_place))
        .route("/places/:id/reviews", get(place_reviews))
}

#[instrument(skip(state, payload))]
pub async fn create_place(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<CreatePlaceRequest>,
) -> Result<(StatusCode, Json<PlaceResponse>), ApiError> {
    let (place, amenities) = state
        .facade
        .create_place(
            &caller,
            NewPlace {
                title: payload.title,
                description: payload.description,
                price: payload.price,
                latitude: payload.latitude,
                longitude: payload.longitude,
                owner_id: payload.owner_id,
                amenities: payload.amenities,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PlaceResponse::new(&place, &amenities)),
    ))
}

#[instrument(skip(state))]
pub async fn list_places(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlaceResponse>>, ApiError> {
    let places = state.facade.list_places().await;
    Ok(Json(
        places
            .iter()
            .map(|(place, amenities)| PlaceResponse::new(place, amenities))
            .collect(),
    ))
}

#[instrument(skip(state))]
pub async fn get_place(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PlaceDetailResponse>, ApiError> {
    let (place, owner, amenities) = state
        .facade
        .get_place(id)
        .await
        .ok_or(ApiError::NotFound("place"))?;
    Ok(Json(PlaceDetailResponse::new(&place, &owner, &amenities)))
}

#[instrument(skip(state, payload))]
pub async fn update_place(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FieldMap>,
) -> Result<Json<PlaceResponse>, ApiError> {
    let (place, amenities) = state.facade.update_place(&caller, id, payload).await?;
    Ok(Json(PlaceResponse::new(&place, &amenities)))
}

#[instrument(skip(state))]
pub async fn place_reviews(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ReviewResponse>>, ApiError> {
    let reviews = state.facade.reviews_for_place(id).await?;
    Ok(Json(reviews.iter().map(ReviewResponse::from).collect()))
}
