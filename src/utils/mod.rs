//! Shared utilities for the SchoolHub API.
//!
//! - [`email`]: The [`email::Mailer`] seam and its SMTP and log-only implementations

pub mod email;
