//! Role profiles: one-to-one extensions of a [`User`](crate::users::User).
//!
//! Every profile row holds a NOT NULL, UNIQUE `user_id` with
//! `ON DELETE CASCADE`, so a profile cannot outlive its user and a user has
//! at most one profile of each kind.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::ids::{DriverId, ParentId, StaffId, StudentId, UserId, VehicleId};

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Student {
    pub id: StudentId,
    pub user_id: UserId,
    pub admission_number: String,
    pub date_of_birth: NaiveDate,
    pub address: String,
    /// Storage key or URL of the uploaded photo
    pub photo: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Staff {
    pub id: StaffId,
    pub user_id: UserId,
    pub designation: String,
    pub employee_id: String,
    pub department: String,
    pub joining_date: NaiveDate,
    pub photo: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Driver {
    pub id: DriverId,
    pub user_id: UserId,
    pub license_number: String,
    pub phone_number: String,
    pub photo: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Parent {
    pub id: ParentId,
    pub user_id: UserId,
    pub phone_number: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// A school vehicle, optionally assigned to one driver.
///
/// `driver_id` is UNIQUE and `ON DELETE SET NULL`: deleting a driver frees
/// the vehicle instead of removing it.
#[derive(Serialize, Deserialize, FromRow, Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct Vehicle {
    pub id: VehicleId,
    pub registration_number: String,
    pub model: String,
    pub capacity: i32,
    pub driver_id: Option<DriverId>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Capacity given to vehicles created through driver provisioning.
pub const DEFAULT_VEHICLE_CAPACITY: i32 = 30;
