//! JWT claim structures for access tokens.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims embedded in an access token.
///
/// `role` is the raw role tag stored on the user. It is re-parsed on every
/// request, so a tag the server does not know simply grants nothing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Claims {
    /// User ID (subject claim)
    pub sub: String,
    pub username: String,
    pub role: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}
