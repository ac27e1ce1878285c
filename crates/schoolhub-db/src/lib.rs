//! # SchoolHub DB
//!
//! Database pool and utilities for the SchoolHub API.
//!
//! This crate provides database connection pool initialization using SQLx
//! with PostgreSQL, and the translation of unique-constraint violations into
//! [`AccountError::UniquenessViolation`].
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_db::{init_db_pool, map_unique_violation};
//!
//! let pool = init_db_pool().await;
//!
//! sqlx::query("INSERT INTO students (user_id, admission_number) VALUES ($1, $2)")
//!     .bind(user_id)
//!     .bind(admission_number)
//!     .execute(&pool)
//!     .await
//!     .map_err(map_unique_violation)?;
//! ```

use std::env;

use schoolhub_core::{AccountError, AppError};

/// Initializes a PostgreSQL connection pool.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is not set or the connection fails. Call once
/// during startup and share the pool through application state.
pub async fn init_db_pool() -> sqlx::PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    sqlx::PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database")
}

/// Field reported to clients for each unique constraint in `migrations/`.
pub fn field_for_constraint(constraint: &str) -> Option<&'static str> {
    match constraint {
        "users_username_key" => Some("username"),
        "students_admission_number_key" => Some("admission_number"),
        "students_user_id_key" | "staff_user_id_key" | "drivers_user_id_key"
        | "parents_user_id_key" => Some("user"),
        "staff_employee_id_key" => Some("employee_id"),
        "drivers_license_number_key" => Some("license_number"),
        "vehicles_registration_number_key" => Some("registration_number"),
        "vehicles_driver_id_key" => Some("driver"),
        _ => None,
    }
}

/// Field behind a unique violation, if `err` is one.
///
/// Constraints not listed in [`field_for_constraint`] report `"record"`.
pub fn unique_violation_field(err: &sqlx::Error) -> Option<&'static str> {
    let db_err = err.as_database_error()?;
    if !db_err.is_unique_violation() {
        return None;
    }

    Some(
        db_err
            .constraint()
            .and_then(field_for_constraint)
            .unwrap_or("record"),
    )
}

/// Converts a unique violation into a 409 and anything else into a database error.
pub fn map_unique_violation(err: sqlx::Error) -> AppError {
    match unique_violation_field(&err) {
        Some(field) => {
            tracing::debug!(field, "Unique constraint violated");
            AccountError::uniqueness(field).into()
        }
        None => AppError::database(err),
    }
}

// Re-export PgPool for convenience
pub use sqlx::PgPool;
