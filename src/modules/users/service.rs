use schoolhub_core::{AccountError, AppError};
use schoolhub_models::{AttachedProfiles, CurrentUserResponse, ProfileKind, User, UserId};
use sqlx::{PgExecutor, PgPool};
use tracing::{info, instrument};

/// Column list matching [`User`].
pub const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, role, created_at, updated_at";

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn get_user<'e>(db: impl PgExecutor<'e>, user_id: UserId) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AccountError::NotFound("User".to_string()).into())
    }

    /// Which role profiles are linked to `user_id`.
    #[instrument(skip(db))]
    pub async fn attached_profiles(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<AttachedProfiles, AppError> {
        let (student, staff, driver, parent) = sqlx::query_as::<_, (bool, bool, bool, bool)>(
            "SELECT
                EXISTS(SELECT 1 FROM students WHERE user_id = $1),
                EXISTS(SELECT 1 FROM staff WHERE user_id = $1),
                EXISTS(SELECT 1 FROM drivers WHERE user_id = $1),
                EXISTS(SELECT 1 FROM parents WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_one(db)
        .await?;

        Ok([
            (student, ProfileKind::Student),
            (staff, ProfileKind::Staff),
            (driver, ProfileKind::Driver),
            (parent, ProfileKind::Parent),
        ]
        .into_iter()
        .filter_map(|(present, kind)| present.then_some(kind))
        .collect())
    }

    #[instrument(skip(db))]
    pub async fn current_user(
        db: &PgPool,
        user_id: UserId,
    ) -> Result<CurrentUserResponse, AppError> {
        let user = Self::get_user(db, user_id).await?;
        let profiles = Self::attached_profiles(db, user_id).await?;

        Ok(CurrentUserResponse {
            role: user.user_role(),
            profiles: profiles.kinds(),
            user,
        })
    }

    /// Removes the user. Profiles cascade; an assigned vehicle is released.
    #[instrument(skip(db))]
    pub async fn delete_user(db: &PgPool, user_id: UserId) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(db)
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AccountError::NotFound("User".to_string()).into());
        }

        info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}
