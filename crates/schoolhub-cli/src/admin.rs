//! Account administration that bypasses the HTTP API.

use schoolhub_core::credentials::generate_password;
use schoolhub_core::hash_password;
use schoolhub_models::UserId;
use schoolhub_models::users::UserRole;
use sqlx::PgPool;

pub struct NewAdmin<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub password: &'a str,
}

/// Login names are stored lowercased.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Inserts an `ADMIN` user. Fails if the username is taken.
pub async fn create_admin(
    db: &PgPool,
    admin: NewAdmin<'_>,
) -> Result<UserId, Box<dyn std::error::Error>> {
    let username = normalize_username(admin.username);
    if username.is_empty() {
        return Err("Username must not be empty".into());
    }

    let hashed_password =
        hash_password(admin.password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let user_id = sqlx::query_scalar::<_, UserId>(
        "INSERT INTO users (username, email, password, first_name, last_name, role)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (username) DO NOTHING
         RETURNING id",
    )
    .bind(&username)
    .bind(admin.email.map(str::trim).filter(|e| !e.is_empty()))
    .bind(&hashed_password)
    .bind(admin.first_name)
    .bind(admin.last_name)
    .bind(UserRole::Admin.as_str())
    .fetch_optional(db)
    .await?;

    user_id.ok_or_else(|| format!("User '{}' already exists", username).into())
}

/// Sets a new password for `username` and returns it.
///
/// A random password is generated when `password` is `None`. This is the
/// recovery path for accounts whose credentials email never arrived.
pub async fn reset_password(
    db: &PgPool,
    username: &str,
    password: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    let username = normalize_username(username);
    let password = password.unwrap_or_else(generate_password);

    let hashed_password =
        hash_password(&password).map_err(|e| format!("Failed to hash password: {}", e.error))?;

    let updated = sqlx::query(
        "UPDATE users SET password = $1, updated_at = NOW() WHERE username = $2",
    )
    .bind(&hashed_password)
    .bind(&username)
    .execute(db)
    .await?
    .rows_affected();

    if updated == 0 {
        return Err(format!("User '{}' not found", username).into());
    }

    Ok(password)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  ADM001 "), "adm001");
    }
}
