//! Authentication and authorization for request handlers.
//!
//! - [`auth`]: [`auth::AuthUser`] extractor validating `Authorization: Bearer <token>`
//! - [`role`]: role checks as a route layer or an extractor
//!
//! ```ignore
//! use crate::middleware::role::RequireAdmin;
//!
//! async fn delete_user(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
//!     // Only executes for ADMIN tokens
//! }
//! ```

pub mod auth;
pub mod role;
