use schoolhub_config::EmailConfig;
use schoolhub_core::credentials::generate_password;
use schoolhub_core::{AccountError, AppError, hash_password};
use schoolhub_db::map_unique_violation;
use schoolhub_models::profiles::DEFAULT_VEHICLE_CAPACITY;
use schoolhub_models::users::UserRole;
use schoolhub_models::{
    AccountDetails, CreateDriverDto, Driver, DriverId, ProvisionedAccount, UpdateDriverDto,
    Vehicle, VehicleDto,
};
use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use tracing::{info, instrument};

use super::notifications::AccountKind;
use super::service::{AccountChanges, NewAccount, ProvisioningService, UniqueKey};
use super::usernames::driver_username;
use crate::modules::users::service::UserService;
use crate::utils::email::Mailer;

const DRIVER_COLUMNS: &str =
    "id, user_id, license_number, phone_number, photo, created_at, updated_at";

const VEHICLE_COLUMNS: &str =
    "id, registration_number, model, capacity, driver_id, created_at, updated_at";

const LICENSE_NUMBER: UniqueKey = UniqueKey {
    table: "drivers",
    column: "license_number",
    field: "license_number",
};

const REGISTRATION_NUMBER: UniqueKey = UniqueKey {
    table: "vehicles",
    column: "registration_number",
    field: "registration_number",
};

impl ProvisioningService {
    /// Creates a driver (role `STAFF`) and, when both model and plate are
    /// given, the vehicle assigned to them.
    #[instrument(skip(db, mailer, email_config, dto), fields(license_number = %dto.license_number))]
    pub async fn create_driver(
        db: &PgPool,
        mailer: &dyn Mailer,
        email_config: &EmailConfig,
        dto: CreateDriverDto,
    ) -> Result<ProvisionedAccount<Driver>, AppError> {
        let license_number = dto.license_number.trim();
        let password = generate_password();
        let password_hash = hash_password(&password)?;

        let mut tx = db.begin().await?;

        Self::ensure_available(&mut tx, &LICENSE_NUMBER, license_number, None).await?;
        let username = Self::pick_username(&mut tx, driver_username).await?;

        let account = NewAccount {
            first_name: &dto.first_name,
            last_name: &dto.last_name,
            email: &dto.email,
            role: UserRole::Staff.as_str(),
        };
        let user = Self::insert_user(&mut tx, &account, &username, &password_hash).await?;

        let driver = sqlx::query_as::<_, Driver>(&format!(
            "INSERT INTO drivers (user_id, license_number, phone_number, photo)
             VALUES ($1, $2, $3, $4)
             RETURNING {}",
            DRIVER_COLUMNS
        ))
        .bind(user.id)
        .bind(license_number)
        .bind(dto.phone_number.trim())
        .bind(&dto.photo)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        let vehicle = match &dto.vehicle {
            Some(vehicle) => Self::upsert_vehicle(&mut tx, driver.id, vehicle).await?,
            None => None,
        };

        tx.commit().await?;
        info!(
            user_id = %user.id,
            driver_id = %driver.id,
            has_vehicle = vehicle.is_some(),
            "Driver provisioned"
        );

        Ok(Self::finish(
            mailer,
            email_config,
            AccountKind::Driver,
            &password,
            user,
            driver,
            vehicle,
        )
        .await)
    }

    /// Updates a driver, the linked user and, when model and plate are
    /// given, the driver's vehicle (created if they had none).
    #[instrument(skip(db, dto))]
    pub async fn update_driver(
        db: &PgPool,
        driver_id: DriverId,
        dto: UpdateDriverDto,
    ) -> Result<AccountDetails<Driver>, AppError> {
        let mut tx = db.begin().await?;

        let existing = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {} FROM drivers WHERE id = $1 FOR UPDATE",
            DRIVER_COLUMNS
        ))
        .bind(driver_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AccountError::NotFound("Driver".to_string()))?;

        let license_number = dto.license_number.as_deref().map(str::trim);
        if let Some(license_number) = license_number {
            Self::ensure_available(
                &mut tx,
                &LICENSE_NUMBER,
                license_number,
                Some(existing.id.into_inner()),
            )
            .await?;
        }

        let driver = sqlx::query_as::<_, Driver>(&format!(
            "UPDATE drivers SET
                license_number = COALESCE($1, license_number),
                phone_number = COALESCE($2, phone_number),
                photo = COALESCE($3, photo),
                updated_at = NOW()
             WHERE id = $4
             RETURNING {}",
            DRIVER_COLUMNS
        ))
        .bind(license_number)
        .bind(dto.phone_number.as_deref().map(str::trim))
        .bind(&dto.photo)
        .bind(driver_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_unique_violation)?;

        let vehicle = match &dto.vehicle {
            Some(vehicle) if vehicle.model_and_plate().is_some() => {
                Self::upsert_vehicle(&mut tx, driver.id, vehicle).await?
            }
            _ => Self::vehicle_of(&mut *tx, driver.id).await?,
        };

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
            profile: driver,
            vehicle,
        })
    }

    #[instrument(skip(db))]
    pub async fn get_driver(
        db: &PgPool,
        driver_id: DriverId,
    ) -> Result<AccountDetails<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>(&format!(
            "SELECT {} FROM drivers WHERE id = $1",
            DRIVER_COLUMNS
        ))
        .bind(driver_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AccountError::NotFound("Driver".to_string()))?;

        let user = UserService::get_user(db, driver.user_id).await?;
        let vehicle = Self::vehicle_of(db, driver.id).await?;

        Ok(AccountDetails {
            user,
            profile: driver,
            vehicle,
        })
    }

    async fn vehicle_of<'e>(
        executor: impl PgExecutor<'e>,
        driver_id: DriverId,
    ) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "SELECT {} FROM vehicles WHERE driver_id = $1",
            VEHICLE_COLUMNS
        ))
        .bind(driver_id)
        .fetch_optional(executor)
        .await?;

        Ok(vehicle)
    }

    /// Writes the driver's vehicle. Returns `None` without touching the
    /// table unless both model and registration number are present; an
    /// omitted capacity keeps the stored one (or the default for new rows).
    async fn upsert_vehicle(
        tx: &mut Transaction<'_, Postgres>,
        driver_id: DriverId,
        dto: &VehicleDto,
    ) -> Result<Option<Vehicle>, AppError> {
        let Some((model, plate)) = dto.model_and_plate() else {
            return Ok(None);
        };

        let current = Self::vehicle_of(&mut **tx, driver_id).await?;
        Self::ensure_available(
            tx,
            &REGISTRATION_NUMBER,
            plate,
            current.as_ref().map(|vehicle| vehicle.id.into_inner()),
        )
        .await?;

        let vehicle = sqlx::query_as::<_, Vehicle>(&format!(
            "INSERT INTO vehicles (registration_number, model, capacity, driver_id)
             VALUES ($1, $2, COALESCE($3, $4), $5)
             ON CONFLICT (driver_id) DO UPDATE SET
                registration_number = EXCLUDED.registration_number,
                model = EXCLUDED.model,
                capacity = COALESCE($3, vehicles.capacity),
                updated_at = NOW()
             RETURNING {}",
            VEHICLE_COLUMNS
        ))
        .bind(plate)
        .bind(model)
        .bind(dto.capacity)
        .bind(DEFAULT_VEHICLE_CAPACITY)
        .bind(driver_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(map_unique_violation)?;

        Ok(Some(vehicle))
    }
}
