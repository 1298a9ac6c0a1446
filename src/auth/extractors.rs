use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use super::dto::{JwtKeys, TokenKind};
use crate::error::ApiError;
use crate::policy::Identity;

/// Extracts and validates a Bearer access token; rejects anonymous callers.
pub struct AuthUser(pub Identity);

/// Like [`AuthUser`] but tolerates a missing Authorization header, for the
/// endpoints anonymous callers may hit. A header that is present but
/// invalid is still rejected.
pub struct MaybeAuthUser(pub Option<Identity>);

fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("invalid Authorization header"))?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .ok_or(ApiError::Unauthorized("invalid auth scheme"))?;
    Ok(Some(token))
}

fn identity_from_token(keys: &JwtKeys, token: &str) -> Result<Identity, ApiError> {
    let claims = keys.verify(token).map_err(|_| {
        warn!("invalid or expired token");
        ApiError::Unauthorized("invalid or expired token")
    })?;
    if claims.kind != TokenKind::Access {
        return Err(ApiError::Unauthorized("access token required"));
    }
    Ok(Identity::new(claims.sub, claims.is_admin))
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let token =
            bearer_token(parts)?.ok_or(ApiError::Unauthorized("missing Authorization header"))?;
        Ok(AuthUser(identity_from_token(&keys, token)?))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        match bearer_token(parts)? {
            None => Ok(MaybeAuthUser(None)),
            Some(token) => Ok(MaybeAuthUser(Some(identity_from_token(&keys, token)?))),
        }
    }
}
