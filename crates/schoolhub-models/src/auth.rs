//! Login and password reset payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::users::User;

pub use schoolhub_auth::Claims;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username is required"))]
    #[schema(example = "adm001")]
    pub username: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

/// First step of the reset flow.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordRequest {
    #[validate(length(min = 1, message = "username is required"))]
    #[schema(example = "adm001")]
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForgotPasswordResponse {
    pub message: String,
    /// Only the first two characters and the domain are revealed.
    #[schema(example = "jo****@school.edu")]
    pub masked_email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    /// Six digit code from the reset email. Sent as a string so malformed
    /// input can be told apart from a wrong code.
    #[schema(example = "482913")]
    pub otp: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1, message = "new_password is required"))]
    pub new_password: String,
    #[validate(length(min = 1, message = "confirm_password is required"))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
