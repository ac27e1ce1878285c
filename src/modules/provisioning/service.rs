//! Shared steps of account provisioning.
//!
//! Each profile kind lives in its own file and follows the same sequence:
//! pre-check unique attributes, pick a username, insert the user and the
//! profile in one transaction, commit, then mail the credentials. Unique
//! violations raised by the database are reported the same way as the
//! pre-checks, so a lost race still surfaces as a 409.

use schoolhub_config::EmailConfig;
use schoolhub_core::{AccountError, AppError};
use schoolhub_db::map_unique_violation;
use schoolhub_models::{ProvisionedAccount, User, UserId, Vehicle};
use schoolhub_observability::track_account_provisioned;
use sqlx::{Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::notifications::{AccountKind, send_credentials};
use super::usernames::MAX_USERNAME_ATTEMPTS;
use crate::modules::users::service::USER_COLUMNS;
use crate::utils::email::Mailer;

pub struct ProvisioningService;

/// A column with a UNIQUE constraint, and the field name reported on conflict.
pub struct UniqueKey {
    pub table: &'static str,
    pub column: &'static str,
    pub field: &'static str,
}

pub const USERNAME: UniqueKey = UniqueKey {
    table: "users",
    column: "username",
    field: "username",
};

/// Identity fields common to every create payload.
pub struct NewAccount<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
}

/// Identity fields an update may change. `None` keeps the stored value.
#[derive(Default)]
pub struct AccountChanges<'a> {
    pub first_name: Option<&'a str>,
    pub last_name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub role: Option<&'a str>,
}

impl ProvisioningService {
    /// Fails with a uniqueness violation when `value` is already used by a
    /// row other than `except`.
    pub(super) async fn ensure_available(
        tx: &mut Transaction<'_, Postgres>,
        key: &UniqueKey,
        value: &str,
        except: Option<Uuid>,
    ) -> Result<(), AppError> {
        let taken = sqlx::query_scalar::<_, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1 AND ($2::uuid IS NULL OR id <> $2))",
            key.table, key.column
        ))
        .bind(value)
        .bind(except)
        .fetch_one(&mut **tx)
        .await?;

        if taken {
            debug!(field = key.field, "Unique value already in use");
            return Err(AccountError::uniqueness(key.field).into());
        }

        Ok(())
    }

    /// First free candidate from `generate`, trying at most
    /// [`MAX_USERNAME_ATTEMPTS`] times.
    pub(super) async fn pick_username(
        tx: &mut Transaction<'_, Postgres>,
        generate: impl Fn() -> String,
    ) -> Result<String, AppError> {
        for attempt in 1..=MAX_USERNAME_ATTEMPTS {
            let candidate = generate();
            match Self::ensure_available(tx, &USERNAME, &candidate, None).await {
                Ok(()) => return Ok(candidate),
                Err(err) if err.account_error().is_some() => {
                    debug!(attempt, "Generated username taken, retrying");
                }
                Err(err) => return Err(err),
            }
        }

        Err(AccountError::uniqueness(USERNAME.field).into())
    }

    pub(super) async fn insert_user(
        tx: &mut Transaction<'_, Postgres>,
        account: &NewAccount<'_>,
        username: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password, first_name, last_name, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(username)
        .bind(account.email.trim())
        .bind(password_hash)
        .bind(account.first_name.trim())
        .bind(account.last_name.trim())
        .bind(account.role)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_unique_violation)
    }

    /// Applies `changes` to the user. Username and password are never touched.
    pub(super) async fn update_user(
        tx: &mut Transaction<'_, Postgres>,
        user_id: UserId,
        changes: AccountChanges<'_>,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET
                first_name = COALESCE($1, first_name),
                last_name = COALESCE($2, last_name),
                email = COALESCE($3, email),
                role = COALESCE($4, role),
                updated_at = NOW()
             WHERE id = $5
             RETURNING {}",
            USER_COLUMNS
        ))
        .bind(changes.first_name.map(str::trim))
        .bind(changes.last_name.map(str::trim))
        .bind(changes.email.map(str::trim))
        .bind(changes.role)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(map_unique_violation)?
        .ok_or_else(|| AccountError::NotFound("User".to_string()).into())
    }

    /// Post-commit step: record the metric and mail the credentials.
    pub(super) async fn finish<P>(
        mailer: &dyn Mailer,
        email_config: &EmailConfig,
        kind: AccountKind,
        password: &str,
        user: User,
        profile: P,
        vehicle: Option<Vehicle>,
    ) -> ProvisionedAccount<P> {
        track_account_provisioned(kind.metric_name());

        let delivery = send_credentials(mailer, email_config, kind, &user, password).await;

        ProvisionedAccount {
            user,
            profile,
            vehicle,
            credentials_sent: delivery.sent,
            warning: delivery.warning,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sqlx::PgPool;

    use super::*;

    async fn take_username(pool: &PgPool, username: &str) {
        sqlx::query(
            "INSERT INTO users (username, password, first_name, last_name, role)
             VALUES ($1, 'x', 'Taken', 'User', 'TEACHER')",
        )
        .bind(username)
        .execute(pool)
        .await
        .unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_pick_username_retries_past_taken_candidates(pool: PgPool) {
        take_username(&pool, "mary_0001").await;
        take_username(&pool, "mary_0002").await;

        let calls = AtomicUsize::new(0);
        let mut tx = pool.begin().await.unwrap();
        let username = ProvisioningService::pick_username(&mut tx, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            format!("mary_{:04}", n)
        })
        .await
        .unwrap();

        assert_eq!(username, "mary_0003");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_pick_username_gives_up_after_max_attempts(pool: PgPool) {
        take_username(&pool, "parent_aaaaaa").await;

        let calls = AtomicUsize::new(0);
        let mut tx = pool.begin().await.unwrap();
        let err = ProvisioningService::pick_username(&mut tx, || {
            calls.fetch_add(1, Ordering::SeqCst);
            "parent_aaaaaa".to_string()
        })
        .await
        .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), MAX_USERNAME_ATTEMPTS);
        assert_eq!(
            err.account_error(),
            Some(&AccountError::uniqueness("username"))
        );
        assert_eq!(err.status, axum::http::StatusCode::CONFLICT);
    }
}
