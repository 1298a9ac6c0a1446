use axum::{
    extract::{FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::dto::{AuthResponse, JwtKeys, LoginRequest, RefreshRequest};
use super::password::verify_password;
use crate::error::ApiError;
use crate::policy::Identity;
use crate::state::AppState;
use crate::users::dto::UserResponse;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = state
        .facade
        .get_user_by_email(&payload.email)
        .await
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            ApiError::InvalidCredentials
        })?;

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.meta.id, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let identity = Identity::new(user.meta.id, user.is_admin);
    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(identity)?;
    let refresh_token = keys.sign_refresh(identity)?;

    info!(user_id = %user.meta.id, email = %user.email, "user logged in");
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: UserResponse::from(&user),
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::Unauthorized("invalid or expired refresh token"))?;

    // Role claims may have changed since the refresh token was minted, so
    // re-read the user instead of trusting the old is_admin value.
    let user = state
        .facade
        .get_user(claims.sub)
        .await
        .ok_or(ApiError::Unauthorized("user no longer exists"))?;

    let identity = Identity::new(user.meta.id, user.is_admin);
    let access_token = keys.sign_access(identity)?;
    let refresh_token = keys.sign_refresh(identity)?;

    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user: UserResponse::from(&user),
    }))
}
