use schoolhub_config::EmailConfig;
use schoolhub_core::credentials::generate_password;
use schoolhub_core::{AccountError, AppError, hash_password};
use schoolhub_db::map_unique_violation;
use schoolhub_models::users::UserRole;
use schoolhub_models::{
    AccountDetails, CreateStaffDto, ProvisionedAccount, Staff, StaffId, UpdateStaffDto,
};
use sqlx::PgPool;
use tracing::{info, instrument};

use super::notifications::AccountKind;
use super::service::{AccountChanges, NewAccount, ProvisioningService, UniqueKey};
use super::usernames::staff_username;
use crate::modules::users::service::UserService;
use crate::utils::email::Mailer;

const STAFF_COLUMNS: &str = "id, user_id, designation, employee_id, department, joining_date, photo, created_at, updated_at";

const EMPLOYEE_ID: UniqueKey = UniqueKey {
    table: "staff",
    column: "employee_id",
    field: "employee_id",
};

impl ProvisioningService {
    /// Creates a staff member with the administrator-chosen role
    /// (TEACHER when omitted).
    #[instrument(skip(db, mailer, email_config, dto), fields(employee_id = %dto.employee_id, role = ?dto.role))]
    pub async fn create_staff(
        db: &PgPool,
        mailer: &dyn Mailer,
        email_config: &EmailConfig,
        dto: CreateStaffDto,
    ) -> Result<ProvisionedAccount<Staff>, AppError> {
        let employee_id = dto.employee_id.trim();
        let role = UserRole::from(dto.role);
        let password = generate_password();
        let password_hash = hash_password(&password)?;

        let mut tx = db.begin().await?;

        Self::ensure_available(&mut tx, &EMPLOYEE_ID, employee_id, None).await?;
        let username = Self::pick_username(&mut tx, || staff_username(&dto.first_name)).await?;

        let account = NewAccount {
            first_name: &dto.first_name,
            last_name: &dto.last_name,
            email: &dto.email,
            role: role.as_str(),
        };
        let user = Self::insert_user(&mut tx, &account, &username, &password_hash).await?;

        let staff = sqlx::query_as::<_, Staff>(&format!(
            "INSERT INTO staff (user_id, designation, employee_id, department, joining_date, photo)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {}",
            STAFF_COLUMNS
        ))
        .bind(user.id)
        .bind(dto.designation.trim())
        .bind(employee_id)
        .bind(dto.department.trim())
        .bind(dto.joining_date)
        .bind(&dto.photo)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        tx.commit().await?;
        info!(user_id = %user.id, staff_id = %staff.id, role = %role, "Staff provisioned");

        Ok(Self::finish(
            mailer,
            email_config,
            AccountKind::Staff,
            &password,
            user,
            staff,
            None,
        )
        .await)
    }

    /// Updates a staff profile plus the linked user's name, email and role.
    #[instrument(skip(db, dto))]
    pub async fn update_staff(
        db: &PgPool,
        staff_id: StaffId,
        dto: UpdateStaffDto,
    ) -> Result<AccountDetails<Staff>, AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {} FROM staff WHERE id = $1 FOR UPDATE",
            STAFF_COLUMNS
        ))
        .bind(staff_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AccountError::NotFound("Staff".to_string()))?;

        let employee_id = dto.employee_id.as_deref().map(str::trim);
        if let Some(employee_id) = employee_id {
            Self::ensure_available(
                &mut tx,
                &EMPLOYEE_ID,
                employee_id,
                Some(existing.id.into_inner()),
            )
            .await?;
        }

        let staff = sqlx::query_as::<_, Staff>(&format!(
            "UPDATE staff SET
                designation = COALESCE($1, designation),
                employee_id = COALESCE($2, employee_id),
                department = COALESCE($3, department),
                joining_date = COALESCE($4, joining_date),
                photo = COALESCE($5, photo),
                updated_at = NOW()
             WHERE id = $6
             RETURNING {}",
            STAFF_COLUMNS
        ))
        .bind(dto.designation.as_deref().map(str::trim))
        .bind(employee_id)
        .bind(dto.department.as_deref().map(str::trim))
        .bind(dto.joining_date)
        .bind(&dto.photo)
        .bind(staff_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        let changes = AccountChanges {
            first_name: dto.first_name.as_deref(),
            last_name: dto.last_name.as_deref(),
            email: dto.email.as_deref(),
            role: dto.role.map(|role| UserRole::from(role).as_str()),
        };
        let user = Self::update_user(&mut tx, existing.user_id, changes).await?;

        tx.commit().await?;

        Ok(AccountDetails {
            user,
            profile: staff,
            vehicle: None,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_staff(
        db: &PgPool,
        staff_id: StaffId,
    ) -> Result<AccountDetails<Staff>, AppError> {
        let staff = sqlx::query_as::<_, Staff>(&format!(
            "SELECT {} FROM staff WHERE id = $1",
            STAFF_COLUMNS
        ))
        .bind(staff_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AccountError::NotFound("Staff".to_string()))?;

        let user = UserService::get_user(db, staff.user_id).await?;

        Ok(AccountDetails {
            user,
            profile: staff,
            vehicle: None,
        })
    }
}
