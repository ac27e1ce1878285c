//! Role-based authorization.
//!
//! [`require_roles`] is the layer-based check used by the router;
//! [`RequireAdmin`] is the extractor form for individual handlers.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use schoolhub_core::AppError;
use schoolhub_models::users::UserRole;

use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Rejects the request unless the token's role is in `allowed_roles`.
pub async fn require_roles(
    State(state): State<AppState>,
    req: Request,
    next: Next,
    allowed_roles: &[UserRole],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await?;
    check_role(&auth_user, allowed_roles)?;

    let req = Request::from_parts(parts, body);
    Ok(next.run(req).await)
}

/// Layer for administrator-only routes.
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/", post(create_student))
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
/// ```
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match require_roles(State(state), req, next, &[UserRole::Admin]).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

pub fn check_role(auth_user: &AuthUser, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    match auth_user.role() {
        Some(role) if allowed_roles.contains(&role) => Ok(()),
        _ => Err(AppError::forbidden(format!(
            "Access denied. Required roles: {}",
            allowed_roles
                .iter()
                .map(UserRole::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Extractor that only admits administrators.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_user = AuthUser::from_request_parts(parts, state).await?;
        check_role(&auth_user, &[UserRole::Admin])?;
        Ok(RequireAdmin(auth_user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schoolhub_auth::Claims;

    fn user(role: &str) -> AuthUser {
        AuthUser(Claims {
            sub: uuid::Uuid::new_v4().to_string(),
            username: "someone".to_string(),
            role: role.to_string(),
            exp: 9999999999,
            iat: 1234567890,
        })
    }

    #[test]
    fn test_admin_passes() {
        assert!(check_role(&user("ADMIN"), &[UserRole::Admin]).is_ok());
    }

    #[test]
    fn test_other_roles_are_forbidden() {
        for role in ["TEACHER", "STUDENT", "PARENT", ""] {
            let err = check_role(&user(role), &[UserRole::Admin]).unwrap_err();
            assert_eq!(err.status.as_u16(), 403, "role {role}");
        }
    }

    #[test]
    fn test_message_lists_allowed_roles() {
        let err = check_role(&user("STUDENT"), &[UserRole::Admin, UserRole::Teacher]).unwrap_err();
        assert_eq!(
            err.error.to_string(),
            "Access denied. Required roles: ADMIN, TEACHER"
        );
    }
}
