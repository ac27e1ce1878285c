//! # SchoolHub Config
//!
//! Configuration types for the SchoolHub API.
//!
//! This crate provides configuration structures loaded from environment variables:
//!
//! - [`jwt`]: JWT authentication configuration
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`email`]: Email/SMTP configuration
//! - [`session`]: Password reset session store and cookie configuration
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_config::{JwtConfig, CorsConfig, EmailConfig, SessionConfig};
//!
//! // Load all configs from environment
//! let jwt_config = JwtConfig::from_env();
//! let cors_config = CorsConfig::from_env();
//! let email_config = EmailConfig::from_env();
//! let session_config = SessionConfig::from_env();
//! ```

pub mod cors;
pub mod email;
pub mod jwt;
pub mod session;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use session::SessionConfig;
