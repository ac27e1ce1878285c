//! # SchoolHub Core
//!
//! Core types, errors, and utilities for the SchoolHub API.
//!
//! This crate provides foundational types used throughout the SchoolHub application:
//!
//! - [`errors`]: HTTP-facing [`AppError`] plus the [`AccountError`] taxonomy
//! - [`password`]: Secure password hashing and verification
//! - [`credentials`]: Random passwords, username suffixes and one-time codes
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_core::errors::{AccountError, AppError};
//! use schoolhub_core::password::{hash_password, verify_password};
//! use schoolhub_core::credentials::generate_password;
//!
//! // Domain errors convert into HTTP errors with the right status code
//! let error: AppError = AccountError::InvalidOtp.into();
//!
//! // Issue and hash an initial password
//! let password = generate_password();
//! let hash = hash_password(&password)?;
//! ```

pub mod credentials;
pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::{AccountError, AppError, ErrorResponse};
pub use password::{hash_password, verify_password};
