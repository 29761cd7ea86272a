use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{
        jwt::JwtKeys,
        session::{extract_cookie, SESSION_COOKIE},
    },
    error::AppError,
    state::AppState,
    users::repo_types::User,
};

/// Validates the session token and yields the caller's user ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Cookie first, then "Bearer <token>"
        let token = extract_cookie(&parts.headers, SESSION_COOKIE)
            .filter(|t| !t.is_empty())
            .or_else(|| {
                parts
                    .headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.strip_prefix("Bearer "))
            })
            .ok_or_else(|| AppError::Unauthorized("Not authorized, no token".into()))?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Unauthorized("Not authorized, token failed".into())
        })?;

        Ok(AuthUser(claims.sub))
    }
}

/// An authenticated caller whose account carries the admin flag.
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;

        let user = state
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Not authorized, user not found".into()))?;

        if !user.is_admin {
            warn!(user_id = %user.id, "admin route denied");
            return Err(AppError::Forbidden("Not authorized as admin".into()));
        }

        Ok(AdminUser(user))
    }
}
