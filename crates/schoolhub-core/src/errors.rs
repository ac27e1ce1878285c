//! Application error types.
//!
//! [`AccountError`] is the domain taxonomy raised by provisioning, login and
//! the password reset workflow. [`AppError`] is what handlers return: an HTTP
//! status plus an [`anyhow::Error`]. Any `AccountError` propagated with `?`
//! keeps its own status code instead of collapsing into a 500.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

/// Failures raised by the account subsystem.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    #[error("{0} not found")]
    NotFound(String),

    /// A unique key (username, admission number, ...) is already taken.
    #[error("A record with this {field} already exists")]
    UniquenessViolation { field: String },

    #[error("Invalid {0} format")]
    InvalidFormat(String),

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("No email address associated with this account. Please contact administrator.")]
    NoEmailOnFile,

    #[error("Mail delivery failed: {0}")]
    MailDeliveryFailure(String),

    /// `complete_reset` was attempted before the OTP was verified.
    #[error("Password reset has not been verified. Please request a new OTP.")]
    ResetNotVerified,

    #[error("Invalid username or password")]
    InvalidCredentials,
}

impl AccountError {
    pub fn uniqueness(field: impl Into<String>) -> Self {
        Self::UniquenessViolation {
            field: field.into(),
        }
    }

    /// HTTP status used when this error reaches the API boundary.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::UniquenessViolation { .. } => StatusCode::CONFLICT,
            Self::InvalidFormat(_)
            | Self::InvalidOtp
            | Self::PasswordMismatch
            | Self::NoEmailOnFile => StatusCode::BAD_REQUEST,
            Self::MailDeliveryFailure(_) => StatusCode::BAD_GATEWAY,
            Self::ResetNotVerified => StatusCode::SEE_OTHER,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

/// JSON body returned for every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, anyhow::anyhow!(message))
    }

    pub fn forbidden(message: String) -> Self {
        Self::new(StatusCode::FORBIDDEN, anyhow::anyhow!(message))
    }

    pub fn internal_error(message: String) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, anyhow::anyhow!(message))
    }

    /// The domain error behind this response, if there is one.
    pub fn account_error(&self) -> Option<&AccountError> {
        self.error.downcast_ref::<AccountError>()
    }
}

/// Body text for server errors that are not part of the account taxonomy.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, error = %self.error, "Request failed");
        }

        // Database and library failures stay in the logs.
        let message = if self.status.is_server_error() && self.account_error().is_none() {
            INTERNAL_ERROR_MESSAGE.to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(json!({ "error": message }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        let error: Error = err.into();
        let status = error
            .downcast_ref::<AccountError>()
            .map(AccountError::status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        Self { status, error }
    }
}
