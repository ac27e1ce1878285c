use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use schoolhub_core::{AppError, ErrorResponse};
use schoolhub_models::users::UserRole;
use schoolhub_models::{AttachedProfiles, Destination, NavigationResponse, UserId};
use tracing::instrument;

use super::routing::{route_dashboard, route_profile};
use crate::middleware::auth::AuthUser;
use crate::modules::users::service::UserService;
use crate::state::AppState;

type Resolver = fn(Option<UserRole>, &AttachedProfiles) -> Option<Destination>;

/// Resolves the destination from the stored role, which may have changed
/// since the token was issued.
async fn resolve(
    state: &AppState,
    user_id: UserId,
    route: Resolver,
) -> Result<Response, AppError> {
    let user = UserService::get_user(&state.db, user_id).await?;
    let profiles = UserService::attached_profiles(&state.db, user_id).await?;

    let destination = route(user.user_role(), &profiles).ok_or_else(|| {
        AppError::forbidden(format!("Access denied for role '{}'", user.role))
    })?;

    Ok(see_other(destination))
}

pub fn see_other(destination: Destination) -> Response {
    (
        StatusCode::SEE_OTHER,
        [(header::LOCATION, destination.path())],
        Json(NavigationResponse::from(destination)),
    )
        .into_response()
}

/// Redirect to the role-specific dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    responses(
        (status = 303, description = "Redirect to the dashboard page", body = NavigationResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role has no dashboard", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Navigation"
)]
#[instrument(skip(state))]
pub async fn dashboard(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Response, AppError> {
    resolve(&state, auth_user.user_id()?, route_dashboard).await
}

/// Redirect to the role-specific profile page
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 303, description = "Redirect to the profile page", body = NavigationResponse),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Role has no profile page", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Navigation"
)]
#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Response, AppError> {
    resolve(&state, auth_user.user_id()?, route_profile).await
}
