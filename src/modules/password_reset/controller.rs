use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use schoolhub_core::{AccountError, AppError, ErrorResponse};
use schoolhub_models::{
    ForgotPasswordRequest, ForgotPasswordResponse, MessageResponse, ResetPasswordRequest,
    VerifyOtpRequest,
};
use tracing::instrument;

use super::cookie::session_id;
use super::service::{PasswordResetService, ResetSession};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Page that starts the reset flow. Unverified completion attempts are sent here.
pub const FORGOT_PASSWORD_PAGE: &str = "/forgot-password/";

fn reset_ttl(state: &AppState) -> Duration {
    Duration::from_secs(state.session_config.reset_ttl_seconds)
}

/// Turns `ResetNotVerified` into a `303 See Other` back to the first step.
fn redirect_if_unverified(err: AppError) -> Response {
    if err.account_error() == Some(&AccountError::ResetNotVerified) {
        let body = Json(serde_json::json!({
            "error": err.error.to_string(),
            "location": FORGOT_PASSWORD_PAGE,
        }));
        return (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, FORGOT_PASSWORD_PAGE)],
            body,
        )
            .into_response();
    }
    err.into_response()
}

/// Request a one-time password for a username
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "OTP sent to the email on file", body = ForgotPasswordResponse),
        (status = 400, description = "No email address on file", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse),
        (status = 502, description = "OTP email could not be delivered", body = ErrorResponse)
    ),
    tag = "Password Reset"
)]
#[instrument(skip(state, jar, dto))]
pub async fn forgot_password(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<ForgotPasswordRequest>,
) -> Result<(CookieJar, Json<ForgotPasswordResponse>), (CookieJar, AppError)> {
    let (jar, id) = session_id(jar, &state.session_config);
    let session = ResetSession::new(state.sessions.as_ref(), &id, reset_ttl(&state));

    match PasswordResetService::request_reset(
        &state.db,
        &session,
        state.mailer.as_ref(),
        &state.email_config,
        &dto.username,
    )
    .await
    {
        Ok(response) => Ok((jar, Json(response))),
        Err(err) => Err((jar, err)),
    }
}

/// Verify the emailed one-time password
#[utoipa::path(
    post,
    path = "/api/auth/verify-otp",
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "OTP verified", body = MessageResponse),
        (status = 400, description = "Invalid OTP or OTP format", body = ErrorResponse)
    ),
    tag = "Password Reset"
)]
#[instrument(skip(state, jar, dto))]
pub async fn verify_otp(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<VerifyOtpRequest>,
) -> Result<(CookieJar, Json<MessageResponse>), (CookieJar, AppError)> {
    let (jar, id) = session_id(jar, &state.session_config);
    let session = ResetSession::new(state.sessions.as_ref(), &id, reset_ttl(&state));

    match PasswordResetService::verify_otp(&session, &dto.otp).await {
        Ok(response) => Ok((jar, Json(response))),
        Err(err) => Err((jar, err)),
    }
}

/// Set a new password after OTP verification
#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = MessageResponse),
        (status = 303, description = "OTP not verified; restart at the forgot-password page", body = ErrorResponse),
        (status = 400, description = "Passwords do not match", body = ErrorResponse),
        (status = 404, description = "User no longer exists", body = ErrorResponse)
    ),
    tag = "Password Reset"
)]
#[instrument(skip(state, jar, dto))]
pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(dto): ValidatedJson<ResetPasswordRequest>,
) -> Response {
    let (jar, id) = session_id(jar, &state.session_config);
    let session = ResetSession::new(state.sessions.as_ref(), &id, reset_ttl(&state));

    match PasswordResetService::complete_reset(&state.db, &session, dto).await {
        Ok(response) => (jar, Json(response)).into_response(),
        Err(err) => (jar, redirect_if_unverified(err)).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unverified_reset_redirects_to_first_step() {
        let response = redirect_if_unverified(AccountError::ResetNotVerified.into());
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            FORGOT_PASSWORD_PAGE
        );
    }

    #[test]
    fn test_other_errors_pass_through() {
        let response = redirect_if_unverified(AccountError::PasswordMismatch.into());
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().get(header::LOCATION).is_none());
    }
}
