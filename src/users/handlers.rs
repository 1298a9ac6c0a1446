use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{CreateUserRequest, UserResponse};
use crate::auth::extractors::{AuthUser, MaybeAuthUser};
use crate::domain::FieldMap;
use crate::error::ApiError;
use crate::facade::NewUser;
use crate::state::AppState;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/:id", get(get_user))
        .route("/users/:id", put(update_user))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state
        .facade
        .create_user(
            caller.as_ref(),
            NewUser {
                first_name: payload.first_name,
                last_name: payload.last_name,
                email: payload.email,
                password: payload.password,
                is_admin: payload.is_admin,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = state.facade.list_users(&caller).await?;
    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .facade
        .get_user(id)
        .await
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(UserResponse::from(&user)))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FieldMap>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.facade.update_user(&caller, id, payload).await?;
    Ok(Json(UserResponse::from(&user)))
}
