//! # SchoolHub Auth
//!
//! Access-token claims and JWT utilities for the SchoolHub API.
//!
//! - [`claims`]: the [`Claims`] carried by every access token
//! - [`jwt`]: token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_auth::{create_access_token, verify_token};
//! use schoolhub_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "adm001", "ADMIN", &config)?;
//! let claims = verify_token(&token, &config)?;
//! ```

pub mod claims;
pub mod jwt;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
