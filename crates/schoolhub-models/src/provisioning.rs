//! Payloads for creating and updating role-linked accounts.
//!
//! Create payloads carry the user's name and email plus the profile's own
//! attributes; the username and password are generated server-side. Update
//! payloads are partial and never touch the username or password.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::profiles::Vehicle;
use crate::users::{StaffRole, User};

/// Rejects whitespace-only values. Stored values are trimmed, so these would
/// otherwise pass `length(min = 1)` and be saved as empty strings. Empty
/// input is left to the length rule.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateStudentDto {
    #[validate(
        length(min = 1, max = 150, message = "first_name is required"),
        custom(function = "not_blank")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, max = 150, message = "last_name is required"),
        custom(function = "not_blank")
    )]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    #[schema(example = "jonathan@school.edu")]
    pub email: String,
    /// Also becomes the login username, lowercased.
    #[validate(
        length(min = 1, max = 20, message = "admission_number must be 1-20 characters"),
        custom(function = "not_blank")
    )]
    #[schema(example = "ADM001")]
    pub admission_number: String,
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 1, message = "address is required"), custom(function = "not_blank"))]
    pub address: String,
    pub photo: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 20), custom(function = "not_blank"))]
    pub admission_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[validate(length(min = 1), custom(function = "not_blank"))]
    pub address: Option<String>,
    pub photo: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateStaffDto {
    #[validate(
        length(min = 1, max = 150, message = "first_name is required"),
        custom(function = "not_blank")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, max = 150, message = "last_name is required"),
        custom(function = "not_blank")
    )]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[serde(default)]
    pub role: StaffRole,
    #[validate(
        length(min = 1, max = 100, message = "designation is required"),
        custom(function = "not_blank")
    )]
    pub designation: String,
    #[validate(
        length(min = 1, max = 20, message = "employee_id must be 1-20 characters"),
        custom(function = "not_blank")
    )]
    pub employee_id: String,
    #[validate(
        length(min = 1, max = 100, message = "department is required"),
        custom(function = "not_blank")
    )]
    pub department: String,
    pub joining_date: NaiveDate,
    pub photo: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateStaffDto {
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub role: Option<StaffRole>,
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub designation: Option<String>,
    #[validate(length(min = 1, max = 20), custom(function = "not_blank"))]
    pub employee_id: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "not_blank"))]
    pub department: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub photo: Option<String>,
}

/// Bus details captured alongside a driver.
#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct VehicleDto {
    #[validate(length(max = 50))]
    #[schema(example = "Tata Starbus 2024")]
    pub model: Option<String>,
    #[validate(length(max = 20))]
    #[schema(example = "DL-01-AB-1234")]
    pub registration_number: Option<String>,
    #[validate(range(min = 1))]
    pub capacity: Option<i32>,
}

impl VehicleDto {
    /// `(model, registration_number)` when both are present and non-blank.
    /// A vehicle is only written when this returns `Some`.
    pub fn model_and_plate(&self) -> Option<(&str, &str)> {
        let model = self.model.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let plate = self
            .registration_number
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())?;
        Some((model, plate))
    }
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateDriverDto {
    #[validate(
        length(min = 1, max = 150, message = "first_name is required"),
        custom(function = "not_blank")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, max = 150, message = "last_name is required"),
        custom(function = "not_blank")
    )]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 1, max = 50, message = "license_number must be 1-50 characters"),
        custom(function = "not_blank")
    )]
    pub license_number: String,
    #[validate(
        length(min = 1, max = 15, message = "phone_number must be 1-15 characters"),
        custom(function = "not_blank")
    )]
    pub phone_number: String,
    pub photo: Option<String>,
    #[validate(nested)]
    pub vehicle: Option<VehicleDto>,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateDriverDto {
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub license_number: Option<String>,
    #[validate(length(min = 1, max = 15), custom(function = "not_blank"))]
    pub phone_number: Option<String>,
    pub photo: Option<String>,
    #[validate(nested)]
    pub vehicle: Option<VehicleDto>,
}

#[derive(Deserialize, Debug, Clone, Validate, ToSchema)]
pub struct CreateParentDto {
    #[validate(
        length(min = 1, max = 150, message = "first_name is required"),
        custom(function = "not_blank")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, max = 150, message = "last_name is required"),
        custom(function = "not_blank")
    )]
    pub last_name: String,
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(
        length(min = 1, max = 15, message = "phone_number must be 1-15 characters"),
        custom(function = "not_blank")
    )]
    pub phone_number: String,
}

#[derive(Deserialize, Debug, Clone, Default, Validate, ToSchema)]
pub struct UpdateParentDto {
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 150), custom(function = "not_blank"))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 15), custom(function = "not_blank"))]
    pub phone_number: Option<String>,
}

/// A user together with one of its profiles.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct AccountDetails<P> {
    pub user: User,
    pub profile: P,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<Vehicle>,
}

/// Result of creating an account.
///
/// The generated password is only ever sent by email; it is not part of this
/// body. When delivery fails the account still exists, `credentials_sent` is
/// false and `warning` explains why.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ProvisionedAccount<P> {
    pub user: User,
    pub profile: P,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<Vehicle>,
    pub credentials_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> CreateStudentDto {
        CreateStudentDto {
            first_name: "Jonathan".into(),
            last_name: "Reyes".into(),
            email: "jonathan@school.edu".into(),
            admission_number: "ADM001".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2012, 5, 17).unwrap(),
            address: "12 School Lane".into(),
            photo: None,
        }
    }

    #[test]
    fn test_valid_student() {
        assert!(student().validate().is_ok());
    }

    #[test]
    fn test_student_rejects_bad_email() {
        let dto = CreateStudentDto {
            email: "not-an-email".into(),
            ..student()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_student_rejects_empty_name() {
        let dto = CreateStudentDto {
            first_name: String::new(),
            ..student()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_student_rejects_whitespace_only_fields() {
        let dto = CreateStudentDto {
            admission_number: "   ".into(),
            first_name: " ".into(),
            address: "\t".into(),
            ..student()
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["admission_number", "first_name", "address"] {
            assert_eq!(fields[field][0].code, "blank", "{field}");
        }
        assert!(!fields.contains_key("last_name"));
    }

    #[test]
    fn test_update_rejects_whitespace_only_values() {
        let dto = UpdateStaffDto {
            employee_id: Some("  ".into()),
            ..UpdateStaffDto::default()
        };
        let errors = dto.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("employee_id"));

        let dto = UpdateStaffDto {
            employee_id: Some(" EMP-9 ".into()),
            ..UpdateStaffDto::default()
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_student_rejects_long_admission_number() {
        let dto = CreateStudentDto {
            admission_number: "A".repeat(21),
            ..student()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_staff_role_defaults_when_omitted() {
        let json = r#"{
            "first_name": "Ada", "last_name": "Obi", "email": "ada@school.edu",
            "designation": "Maths Teacher", "employee_id": "EMP-7",
            "department": "Sciences", "joining_date": "2020-09-01"
        }"#;
        let dto: CreateStaffDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.role, StaffRole::Teacher);
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_vehicle_needs_model_and_plate() {
        let both = VehicleDto {
            model: Some("Starbus".into()),
            registration_number: Some(" DL-01 ".into()),
            capacity: None,
        };
        assert_eq!(both.model_and_plate(), Some(("Starbus", "DL-01")));

        let plate_only = VehicleDto {
            model: Some("  ".into()),
            ..both.clone()
        };
        assert_eq!(plate_only.model_and_plate(), None);
        assert_eq!(VehicleDto::default().model_and_plate(), None);
    }

    #[test]
    fn test_driver_validates_nested_vehicle() {
        let dto = CreateDriverDto {
            first_name: "Sam".into(),
            last_name: "Ade".into(),
            email: "sam@school.edu".into(),
            license_number: "LIC-1".into(),
            phone_number: "0800000000".into(),
            photo: None,
            vehicle: Some(VehicleDto {
                model: Some("Bus".into()),
                registration_number: Some("X".into()),
                capacity: Some(0),
            }),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_dto_empty_is_valid() {
        assert!(UpdateStudentDto::default().validate().is_ok());
        assert!(UpdateStaffDto::default().validate().is_ok());
        assert!(UpdateDriverDto::default().validate().is_ok());
        assert!(UpdateParentDto::default().validate().is_ok());
    }

    #[test]
    fn test_update_dto_rejects_blank_name() {
        let dto = UpdateParentDto {
            first_name: Some(String::new()),
            ..UpdateParentDto::default()
        };
        assert!(dto.validate().is_err());
    }
}
