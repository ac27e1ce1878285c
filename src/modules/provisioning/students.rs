use schoolhub_config::EmailConfig;
use schoolhub_core::credentials::generate_password;
use schoolhub_core::{AccountError, AppError, hash_password};
use schoolhub_db::map_unique_violation;
use schoolhub_models::users::UserRole;
use schoolhub_models::{
    AccountDetails, CreateStudentDto, ProvisionedAccount, Student, StudentId, UpdateStudentDto,
};
use sqlx::PgPool;
use tracing::{info, instrument};

use super::notifications::AccountKind;
use super::service::{AccountChanges, NewAccount, ProvisioningService, USERNAME, UniqueKey};
use super::usernames::student_username;
use crate::modules::users::service::UserService;
use crate::utils::email::Mailer;

const STUDENT_COLUMNS: &str =
    "id, user_id, admission_number, date_of_birth, address, photo, created_at, updated_at";

const ADMISSION_NUMBER: UniqueKey = UniqueKey {
    table: "students",
    column: "admission_number",
    field: "admission_number",
};

impl ProvisioningService {
    /// Creates a student and its user. The username is the lowercased
    /// admission number.
    #[instrument(skip(db, mailer, email_config, dto), fields(admission_number = %dto.admission_number))]
    pub async fn create_student(
        db: &PgPool,
        mailer: &dyn Mailer,
        email_config: &EmailConfig,
        dto: CreateStudentDto,
    ) -> Result<ProvisionedAccount<Student>, AppError> {
        let admission_number = dto.admission_number.trim();
        let username = student_username(admission_number);
        let password = generate_password();
        let password_hash = hash_password(&password)?;

        let mut tx = db.begin().await?;

        Self::ensure_available(&mut tx, &ADMISSION_NUMBER, admission_number, None).await?;
        Self::ensure_available(&mut tx, &USERNAME, &username, None).await?;

        let account = NewAccount {
            first_name: &dto.first_name,
            last_name: &dto.last_name,
            email: &dto.email,
            role: UserRole::Student.as_str(),
        };
        let user = Self::insert_user(&mut tx, &account, &username, &password_hash).await?;

        let student = sqlx::query_as::<_, Student>(&format!(
            "INSERT INTO students (user_id, admission_number, date_of_birth, address, photo)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(user.id)
        .bind(admission_number)
        .bind(dto.date_of_birth)
        .bind(dto.address.trim())
        .bind(&dto.photo)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        tx.commit().await?;
        info!(user_id = %user.id, student_id = %student.id, "Student provisioned");

        Ok(Self::finish(
            mailer,
            email_config,
            AccountKind::Student,
            &password,
            user,
            student,
            None,
        )
        .await)
    }

    /// Updates a student's profile and the linked user's name and email.
    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        student_id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<AccountDetails<Student>, AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id = $1 FOR UPDATE",
            STUDENT_COLUMNS
        ))
        .bind(student_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AccountError::NotFound("Student".to_string()))?;

        let admission_number = dto.admission_number.as_deref().map(str::trim);
        if let Some(admission_number) = admission_number {
            Self::ensure_available(
                &mut tx,
                &ADMISSION_NUMBER,
                admission_number,
                Some(existing.id.into_inner()),
            )
            .await?;
        }

        let student = sqlx::query_as::<_, Student>(&format!(
            "UPDATE students SET
                admission_number = COALESCE($1, admission_number),
                date_of_birth = COALESCE($2, date_of_birth),
                address = COALESCE($3, address),
                photo = COALESCE($4, photo),
                updated_at = NOW()
             WHERE id = $5
             RETURNING {}",
            STUDENT_COLUMNS
        ))
        .bind(admission_number)
        .bind(dto.date_of_birth)
        .bind(dto.address.as_deref().map(str::trim))
        .bind(&dto.photo)
        .bind(student_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        let changes = AccountChanges {
            first_name: dto.first_name.as_deref(),
            last_name: dto.last_name.as_deref(),
            email: dto.email.as_deref(),
            role: None,
        };
        let user = Self::update_user(&mut tx, existing.user_id, changes).await?;

        tx.commit().await?;

        Ok(AccountDetails {
            user,
            profile: student,
            vehicle: None,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_student(
        db: &PgPool,
        student_id: StudentId,
    ) -> Result<AccountDetails<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {} FROM students WHERE id = $1",
            STUDENT_COLUMNS
        ))
        .bind(student_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AccountError::NotFound("Student".to_string()))?;

        let user = UserService::get_user(db, student.user_id).await?;

        Ok(AccountDetails {
            user,
            profile: student,
            vehicle: None,
        })
    }
}
