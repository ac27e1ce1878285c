use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use schoolhub_core::{AppError, ErrorResponse};
use schoolhub_models::{CurrentUserResponse, UserId};
use tracing::instrument;

use super::service::UserService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::RequireAdmin;
use crate::state::AppState;

/// Get the authenticated user and their linked profiles
#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Current user", body = CurrentUserResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_current_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<CurrentUserResponse>, AppError> {
    let user_id = auth_user.user_id()?;
    let response = UserService::current_user(&state.db, user_id).await?;
    Ok(Json(response))
}

/// Delete a user and every profile linked to it
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted"),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<UserId>,
) -> Result<StatusCode, AppError> {
    UserService::delete_user(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
