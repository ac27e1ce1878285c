//! Seed data structures and seeding configuration.

use chrono::NaiveDate;
use schoolhub_models::users::{PARENT_ROLE_TAG, UserRole};

/// The profile kinds the seeder knows how to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedKind {
    Student,
    Staff,
    Driver,
    Parent,
}

impl SeedKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Student => "students",
            Self::Staff => "staff",
            Self::Driver => "drivers",
            Self::Parent => "parents",
        }
    }

    /// Role tag stored on the backing user row.
    pub fn role_tag(self) -> &'static str {
        match self {
            Self::Student => UserRole::Student.as_str(),
            Self::Staff => UserRole::Teacher.as_str(),
            Self::Driver => UserRole::Staff.as_str(),
            Self::Parent => PARENT_ROLE_TAG,
        }
    }
}

/// Seed data for the user row behind a profile.
#[derive(Debug, Clone)]
pub struct AccountSeed {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: &'static str,
}

/// Role-specific profile attributes.
#[derive(Debug, Clone)]
pub enum ProfileSeed {
    Student {
        admission_number: String,
        date_of_birth: NaiveDate,
        address: String,
    },
    Staff {
        designation: String,
        employee_id: String,
        department: String,
        joining_date: NaiveDate,
    },
    Driver {
        license_number: String,
        phone_number: String,
        vehicle: VehicleSeed,
    },
    Parent {
        phone_number: String,
    },
}

#[derive(Debug, Clone)]
pub struct VehicleSeed {
    pub registration_number: String,
    pub model: String,
    pub capacity: i32,
}

/// One generated account: a user plus its profile.
#[derive(Debug, Clone)]
pub struct PersonSeed {
    pub account: AccountSeed,
    pub profile: ProfileSeed,
}

/// How many accounts of each kind to seed.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub students: usize,
    pub staff: usize,
    pub drivers: usize,
    pub parents: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            students: 100,
            staff: 20,
            drivers: 5,
            parents: 50,
        }
    }
}

impl SeedConfig {
    pub fn total(&self) -> usize {
        self.students + self.staff + self.drivers + self.parents
    }

    pub fn counts(&self) -> [(SeedKind, usize); 4] {
        [
            (SeedKind::Student, self.students),
            (SeedKind::Staff, self.staff),
            (SeedKind::Driver, self.drivers),
            (SeedKind::Parent, self.parents),
        ]
    }
}
