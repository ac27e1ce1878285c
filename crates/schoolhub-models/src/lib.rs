//! # SchoolHub Models
//!
//! Domain models and DTOs for the SchoolHub API.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed entity identifiers
//! - [`users`]: The user directory and role tags
//! - [`profiles`]: Student, staff, driver and parent profiles plus vehicles
//! - [`provisioning`]: Create/update payloads for each profile kind
//! - [`auth`]: Login and password reset payloads
//! - [`navigation`]: Attached-profile sets and routing destinations
//!
//! # Example
//!
//! ```ignore
//! use schoolhub_models::users::UserRole;
//! use schoolhub_models::navigation::{AttachedProfiles, ProfileKind};
//!
//! let role: Option<UserRole> = "TEACHER".parse().ok();
//! let profiles = AttachedProfiles::from_iter([ProfileKind::Staff, ProfileKind::Driver]);
//! assert!(profiles.contains(ProfileKind::Driver));
//! ```

pub mod auth;
pub mod ids;
pub mod navigation;
pub mod profiles;
pub mod provisioning;
pub mod users;

// Re-export commonly used types at crate root for convenience
pub use auth::{
    Claims, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, LoginResponse,
    MessageResponse, ResetPasswordRequest, VerifyOtpRequest,
};
pub use ids::{DriverId, ParentId, StaffId, StudentId, UserId, VehicleId};
pub use navigation::{AttachedProfiles, Destination, NavigationResponse, ProfileKind};
pub use profiles::{Driver, Parent, Staff, Student, Vehicle};
pub use provisioning::{
    AccountDetails, CreateDriverDto, CreateParentDto, CreateStaffDto, CreateStudentDto,
    ProvisionedAccount, UpdateDriverDto, UpdateParentDto, UpdateStaffDto, UpdateStudentDto,
    VehicleDto,
};
pub use users::{
    CurrentUserResponse, PARENT_ROLE_TAG, StaffRole, User, UserCredentials, UserRole,
};
