use schoolhub_core::ErrorResponse;
use schoolhub_models::navigation::{Destination, NavigationResponse, ProfileKind};
use schoolhub_models::{
    CreateDriverDto, CreateParentDto, CreateStaffDto, CreateStudentDto, CurrentUserResponse,
    Driver, ForgotPasswordRequest, ForgotPasswordResponse, LoginRequest, LoginResponse,
    MessageResponse, Parent, ResetPasswordRequest, Staff, StaffRole, Student, UpdateDriverDto,
    UpdateParentDto, UpdateStaffDto, UpdateStudentDto, User, UserRole, Vehicle, VehicleDto,
    VerifyOtpRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::login_user,
        crate::modules::password_reset::controller::forgot_password,
        crate::modules::password_reset::controller::verify_otp,
        crate::modules::password_reset::controller::reset_password,
        crate::modules::navigation::controller::dashboard,
        crate::modules::navigation::controller::profile,
        crate::modules::users::controller::get_current_user,
        crate::modules::users::controller::delete_user,
        crate::modules::provisioning::controller::create_student,
        crate::modules::provisioning::controller::get_student,
        crate::modules::provisioning::controller::update_student,
        crate::modules::provisioning::controller::create_staff,
        crate::modules::provisioning::controller::get_staff,
        crate::modules::provisioning::controller::update_staff,
        crate::modules::provisioning::controller::create_driver,
        crate::modules::provisioning::controller::get_driver,
        crate::modules::provisioning::controller::update_driver,
        crate::modules::provisioning::controller::create_parent,
        crate::modules::provisioning::controller::get_parent,
        crate::modules::provisioning::controller::update_parent,
    ),
    components(
        schemas(
            User,
            UserRole,
            StaffRole,
            CurrentUserResponse,
            ProfileKind,
            Destination,
            NavigationResponse,
            LoginRequest,
            LoginResponse,
            ForgotPasswordRequest,
            ForgotPasswordResponse,
            VerifyOtpRequest,
            ResetPasswordRequest,
            MessageResponse,
            ErrorResponse,
            Student,
            Staff,
            Driver,
            Parent,
            Vehicle,
            CreateStudentDto,
            UpdateStudentDto,
            CreateStaffDto,
            UpdateStaffDto,
            CreateDriverDto,
            UpdateDriverDto,
            VehicleDto,
            CreateParentDto,
            UpdateParentDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Login endpoint"),
        (name = "Password Reset", description = "OTP-based password reset flow"),
        (name = "Navigation", description = "Role-based dashboard and profile redirects"),
        (name = "Users", description = "Current user and account removal"),
        (name = "Students", description = "Student provisioning"),
        (name = "Staff", description = "Staff provisioning"),
        (name = "Drivers", description = "Driver and vehicle provisioning"),
        (name = "Parents", description = "Parent provisioning")
    ),
    info(
        title = "SchoolHub API",
        version = "0.1.0",
        description = "School accounts API: role-based provisioning, OTP password reset and dashboard routing.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/auth/login",
            "/api/auth/forgot-password",
            "/api/auth/verify-otp",
            "/api/auth/reset-password",
            "/api/dashboard",
            "/api/profile",
            "/api/users/me",
            "/api/users/{id}",
            "/api/students",
            "/api/students/{id}",
            "/api/staff",
            "/api/drivers/{id}",
            "/api/parents",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
