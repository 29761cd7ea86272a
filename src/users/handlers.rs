use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        extractors::{AdminUser, AuthUser},
        password::verify_dummy,
        session::SessionCookie,
    },
    error::{AppError, AppResult, JsonBody},
    state::AppState,
    users::{
        dto::{
            LoginRequest, MessageResponse, PublicUser, RegisterRequest, RegisteredUser,
            UpdateProfileRequest,
        },
        repo::StoreError,
        repo_types::NewUser,
        services::{apply_profile_patch, is_valid_email, normalize_email, PatchError},
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(register_user).get(list_users))
        .route("/users/", post(register_user).get(list_users))
        .route("/users/login", post(auth_user))
        .route("/users/logout", get(logout_user).post(logout_user))
        .route(
            "/users/profile",
            get(get_user_profile).put(update_user_profile),
        )
        .route(
            "/users/:id",
            get(get_user_by_id).put(update_user).delete(delete_user),
        )
}

#[instrument(skip(state, payload))]
pub async fn auth_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<(StatusCode, SessionCookie, Json<PublicUser>)> {
    let email = normalize_email(&payload.email);
    let invalid = || AppError::Unauthorized("Invalid email or password".into());

    let user = match state.store.find_by_email(&email).await? {
        Some(u) => u,
        None => {
            verify_dummy(&payload.password);
            warn!(email = %email, "login unknown email");
            return Err(invalid());
        }
    };

    if !user.match_password(&payload.password)? {
        warn!(email = %email, user_id = %user.id, "login invalid password");
        return Err(invalid());
    }

    let session = SessionCookie::issue(&state, user.id)?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((StatusCode::OK, session, Json(PublicUser::from(&user))))
}

#[instrument(skip(state, payload))]
pub async fn register_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> AppResult<(StatusCode, SessionCookie, Json<RegisteredUser>)> {
    let email = normalize_email(&payload.email);
    let name = payload.name.trim().to_string();

    if state.store.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::BadRequest("User already exists".into()));
    }

    if name.is_empty() || payload.password.is_empty() || !is_valid_email(&email) {
        warn!(email = %email, "invalid registration data");
        return Err(AppError::BadRequest("Invalid user data".into()));
    }

    let surname = payload
        .surname
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let new_user = NewUser::new(name, surname, email, &payload.password)?;
    let user = match state.store.create(new_user).await {
        Ok(u) => u,
        Err(StoreError::DuplicateEmail) => {
            warn!("email registered concurrently");
            return Err(AppError::BadRequest("User already exists".into()));
        }
        Err(e) => return Err(e.into()),
    };

    let session = SessionCookie::issue(&state, user.id)?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, session, Json(RegisteredUser::from(&user))))
}

#[instrument(skip(state))]
pub async fn logout_user(
    State(state): State<AppState>,
) -> (StatusCode, SessionCookie, Json<MessageResponse>) {
    (
        StatusCode::OK,
        SessionCookie::clear(&state),
        Json(MessageResponse {
            message: "Logged out successfully".into(),
        }),
    )
}

#[instrument(skip(state))]
pub async fn get_user_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let user = state.store.find_by_id(user_id).await?.ok_or_else(|| {
        warn!(user_id = %user_id, "profile lookup for missing user");
        AppError::NotFound("User not found".into())
    })?;

    Ok(Json(PublicUser::from(&user)))
}

#[instrument(skip(state, patch))]
pub async fn update_user_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    JsonBody(patch): JsonBody<UpdateProfileRequest>,
) -> AppResult<Json<PublicUser>> {
    let mut user = state
        .store
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    let rehashed = apply_profile_patch(&mut user, patch).map_err(|e| match e {
        PatchError::InvalidEmail => AppError::BadRequest("Invalid email".into()),
        PatchError::Hash(e) => AppError::Internal(e),
    })?;

    let saved = state.store.save(&user).await?;

    info!(user_id = %saved.id, password_changed = rehashed, "profile updated");
    Ok(Json(PublicUser::from(&saved)))
}

// Admin endpoints are gated but have no behaviour yet.

#[instrument(skip_all)]
pub async fn list_users(AdminUser(admin): AdminUser) -> AppResult<Json<Vec<PublicUser>>> {
    info!(admin_id = %admin.id, "list users requested");
    Err(AppError::NotImplemented("List users is not implemented".into()))
}

#[instrument(skip_all)]
pub async fn get_user_by_id(
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<PublicUser>> {
    info!(admin_id = %admin.id, target_id = %id, "get user requested");
    Err(AppError::NotImplemented("Get user by id is not implemented".into()))
}

#[instrument(skip_all)]
pub async fn update_user(
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<PublicUser>> {
    info!(admin_id = %admin.id, target_id = %id, "update user requested");
    Err(AppError::NotImplemented("Update user is not implemented".into()))
}

#[instrument(skip_all)]
pub async fn delete_user(
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    info!(admin_id = %admin.id, target_id = %id, "delete user requested");
    Err(AppError::NotImplemented("Delete user is not implemented".into()))
}
