use schoolhub_config::EmailConfig;
use schoolhub_core::credentials::generate_password;
use schoolhub_core::{AccountError, AppError, hash_password};
use schoolhub_db::map_unique_violation;
use schoolhub_models::{
    AccountDetails, CreateParentDto, PARENT_ROLE_TAG, Parent, ParentId, ProvisionedAccount,
    UpdateParentDto,
};
use sqlx::PgPool;
use tracing::{info, instrument};

use super::notifications::AccountKind;
use super::service::{AccountChanges, NewAccount, ProvisioningService};
use super::usernames::parent_username;
use crate::modules::users::service::UserService;
use crate::utils::email::Mailer;

const PARENT_COLUMNS: &str = "id, user_id, phone_number, created_at, updated_at";

impl ProvisioningService {
    /// Creates a parent account. Parents carry the `PARENT` role tag, which
    /// has no dashboard.
    #[instrument(skip(db, mailer, email_config, dto))]
    pub async fn create_parent(
        db: &PgPool,
        mailer: &dyn Mailer,
        email_config: &EmailConfig,
        dto: CreateParentDto,
    ) -> Result<ProvisionedAccount<Parent>, AppError> {
        let password = generate_password();
        let password_hash = hash_password(&password)?;

        let mut tx = db.begin().await?;

        let username = Self::pick_username(&mut tx, parent_username).await?;

        let account = NewAccount {
            first_name: &dto.first_name,
            last_name: &dto.last_name,
            email: &dto.email,
            role: PARENT_ROLE_TAG,
        };
        let user = Self::insert_user(&mut tx, &account, &username, &password_hash).await?;

        let parent = sqlx::query_as::<_, Parent>(&format!(
            "INSERT INTO parents (user_id, phone_number) VALUES ($1, $2) RETURNING {}",
            PARENT_COLUMNS
        ))
        .bind(user.id)
        .bind(dto.phone_number.trim())
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        tx.commit().await?;
        info!(user_id = %user.id, parent_id = %parent.id, "Parent provisioned");

        Ok(Self::finish(
            mailer,
            email_config,
            AccountKind::Parent,
            &password,
            user,
            parent,
            None,
        )
        .await)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_parent(
        db: &PgPool,
        parent_id: ParentId,
        dto: UpdateParentDto,
    ) -> Result<AccountDetails<Parent>, AppError> {
        let mut tx = db.begin().await?;

        let parent = sqlx::query_as::<_, Parent>(&format!(
            "UPDATE parents SET
                phone_number = COALESCE($1, phone_number),
                updated_at = NOW()
             WHERE id = $2
             RETURNING {}",
            PARENT_COLUMNS
        ))
        .bind(dto.phone_number.as_deref().map(str::trim))
        .bind(parent_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AccountError::NotFound("Parent".to_string()))?;

        let changes = AccountChanges {
            first_name: dto.first_name.as_deref(),
            last_name: dto.last_name.as_deref(),
            email: dto.email.as_deref(),
            role: None,
        };
        let user = Self::update_user(&mut tx, parent.user_id, changes).await?;

        tx.commit().await?;

        Ok(AccountDetails {
            user,
            profile: parent,
            vehicle: None,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_parent(
        db: &PgPool,
        parent_id: ParentId,
    ) -> Result<AccountDetails<Parent>, AppError> {
        let parent = sqlx::query_as::<_, Parent>(&format!(
            "SELECT {} FROM parents WHERE id = $1",
            PARENT_COLUMNS
        ))
        .bind(parent_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AccountError::NotFound("Parent".to_string()))?;

        let user = UserService::get_user(db, parent.user_id).await?;

        Ok(AccountDetails {
            user,
            profile: parent,
            vehicle: None,
        })
    }
}
