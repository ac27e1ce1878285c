//! Login name policy for provisioned accounts.
//!
//! Students log in with their admission number. Everyone else gets a
//! generated name with a random suffix, retried a few times on collision.

use schoolhub_core::credentials::random_suffix;

/// Generated candidates checked before giving up with a username conflict.
pub const MAX_USERNAME_ATTEMPTS: usize = 5;

/// Longest name-derived part of a staff username. Names may be up to 150
/// characters, the same as `users.username`, so the prefix must be capped.
pub const MAX_STAFF_PREFIX_LEN: usize = 30;

pub fn student_username(admission_number: &str) -> String {
    admission_number.trim().to_lowercase()
}

/// Lowercased ASCII letters and digits of `first_name`, at most
/// [`MAX_STAFF_PREFIX_LEN`] of them, or `staff`.
pub fn staff_prefix(first_name: &str) -> String {
    let prefix: String = first_name
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(MAX_STAFF_PREFIX_LEN)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if prefix.is_empty() {
        "staff".to_string()
    } else {
        prefix
    }
}

pub fn staff_username(first_name: &str) -> String {
    format!("{}_{}", staff_prefix(first_name), random_suffix(4))
}

pub fn driver_username() -> String {
    format!("driver_{}", random_suffix(6))
}

pub fn parent_username() -> String {
    format!("parent_{}", random_suffix(6))
}
