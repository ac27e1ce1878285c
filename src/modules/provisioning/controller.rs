//! HTTP handlers for account provisioning.
//!
//! Every route here sits behind the administrator layer installed by the
//! application router.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use schoolhub_core::{AppError, ErrorResponse};
use schoolhub_models::{
    AccountDetails, CreateDriverDto, CreateParentDto, CreateStaffDto, CreateStudentDto, Driver,
    DriverId, Parent, ParentId, ProvisionedAccount, Staff, StaffId, Student, StudentId,
    UpdateDriverDto, UpdateParentDto, UpdateStaffDto, UpdateStudentDto,
};
use tracing::instrument;

use super::service::ProvisioningService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Provision a student account
///
/// The username is the lowercased admission number. Credentials are emailed
/// to the student.
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = ProvisionedAccount<Student>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 409, description = "Admission number or username already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<ProvisionedAccount<Student>>), AppError> {
    let account = ProvisioningService::create_student(
        &state.db,
        state.mailer.as_ref(),
        &state.email_config,
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(
        ("id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student with its user", body = AccountDetails<Student>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
) -> Result<Json<AccountDetails<Student>>, AppError> {
    let details = ProvisioningService::get_student(&state.db, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(
        ("id" = String, Path, description = "Student ID")
    ),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = AccountDetails<Student>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 409, description = "Unique value already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Students"
)]
#[instrument(skip(state, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    Path(id): Path<StudentId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<AccountDetails<Student>>, AppError> {
    let details = ProvisioningService::update_student(&state.db, id, dto).await?;
    Ok(Json(details))
}

/// Provision a staff account
///
/// The role defaults to TEACHER. Credentials are emailed to the staff member.
#[utoipa::path(
    post,
    path = "/api/staff",
    request_body = CreateStaffDto,
    responses(
        (status = 201, description = "Staff created", body = ProvisionedAccount<Staff>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 409, description = "Employee ID or username already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Staff"
)]
#[instrument(skip(state, dto))]
pub async fn create_staff(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStaffDto>,
) -> Result<(StatusCode, Json<ProvisionedAccount<Staff>>), AppError> {
    let account = ProvisioningService::create_staff(
        &state.db,
        state.mailer.as_ref(),
        &state.email_config,
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    get,
    path = "/api/staff/{id}",
    params(
        ("id" = String, Path, description = "Staff ID")
    ),
    responses(
        (status = 200, description = "Staff with its user", body = AccountDetails<Staff>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 404, description = "Staff not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Staff"
)]
#[instrument(skip(state))]
pub async fn get_staff(
    State(state): State<AppState>,
    Path(id): Path<StaffId>,
) -> Result<Json<AccountDetails<Staff>>, AppError> {
    let details = ProvisioningService::get_staff(&state.db, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    put,
    path = "/api/staff/{id}",
    params(
        ("id" = String, Path, description = "Staff ID")
    ),
    request_body = UpdateStaffDto,
    responses(
        (status = 200, description = "Staff updated", body = AccountDetails<Staff>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 404, description = "Staff not found", body = ErrorResponse),
        (status = 409, description = "Unique value already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Staff"
)]
#[instrument(skip(state, dto))]
pub async fn update_staff(
    State(state): State<AppState>,
    Path(id): Path<StaffId>,
    ValidatedJson(dto): ValidatedJson<UpdateStaffDto>,
) -> Result<Json<AccountDetails<Staff>>, AppError> {
    let details = ProvisioningService::update_staff(&state.db, id, dto).await?;
    Ok(Json(details))
}

/// Provision a driver account
///
/// A vehicle is registered when both its model and registration number are
/// given.
#[utoipa::path(
    post,
    path = "/api/drivers",
    request_body = CreateDriverDto,
    responses(
        (status = 201, description = "Driver created", body = ProvisionedAccount<Driver>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 409, description = "License number, registration number or username already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Drivers"
)]
#[instrument(skip(state, dto))]
pub async fn create_driver(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateDriverDto>,
) -> Result<(StatusCode, Json<ProvisionedAccount<Driver>>), AppError> {
    let account = ProvisioningService::create_driver(
        &state.db,
        state.mailer.as_ref(),
        &state.email_config,
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    get,
    path = "/api/drivers/{id}",
    params(
        ("id" = String, Path, description = "Driver ID")
    ),
    responses(
        (status = 200, description = "Driver with its user", body = AccountDetails<Driver>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 404, description = "Driver not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Drivers"
)]
#[instrument(skip(state))]
pub async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<DriverId>,
) -> Result<Json<AccountDetails<Driver>>, AppError> {
    let details = ProvisioningService::get_driver(&state.db, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    put,
    path = "/api/drivers/{id}",
    params(
        ("id" = String, Path, description = "Driver ID")
    ),
    request_body = UpdateDriverDto,
    responses(
        (status = 200, description = "Driver updated", body = AccountDetails<Driver>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 404, description = "Driver not found", body = ErrorResponse),
        (status = 409, description = "Unique value already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Drivers"
)]
#[instrument(skip(state, dto))]
pub async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<DriverId>,
    ValidatedJson(dto): ValidatedJson<UpdateDriverDto>,
) -> Result<Json<AccountDetails<Driver>>, AppError> {
    let details = ProvisioningService::update_driver(&state.db, id, dto).await?;
    Ok(Json(details))
}

/// Provision a parent account
#[utoipa::path(
    post,
    path = "/api/parents",
    request_body = CreateParentDto,
    responses(
        (status = 201, description = "Parent created", body = ProvisionedAccount<Parent>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 409, description = "Username already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Parents"
)]
#[instrument(skip(state, dto))]
pub async fn create_parent(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateParentDto>,
) -> Result<(StatusCode, Json<ProvisionedAccount<Parent>>), AppError> {
    let account = ProvisioningService::create_parent(
        &state.db,
        state.mailer.as_ref(),
        &state.email_config,
        dto,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    get,
    path = "/api/parents/{id}",
    params(
        ("id" = String, Path, description = "Parent ID")
    ),
    responses(
        (status = 200, description = "Parent with its user", body = AccountDetails<Parent>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 404, description = "Parent not found", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Parents"
)]
#[instrument(skip(state))]
pub async fn get_parent(
    State(state): State<AppState>,
    Path(id): Path<ParentId>,
) -> Result<Json<AccountDetails<Parent>>, AppError> {
    let details = ProvisioningService::get_parent(&state.db, id).await?;
    Ok(Json(details))
}

#[utoipa::path(
    put,
    path = "/api/parents/{id}",
    params(
        ("id" = String, Path, description = "Parent ID")
    ),
    request_body = UpdateParentDto,
    responses(
        (status = 200, description = "Parent updated", body = AccountDetails<Parent>),
        (status = 401, description = "Unauthorized - missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Administrator role required", body = ErrorResponse),
        (status = 404, description = "Parent not found", body = ErrorResponse),
        (status = 409, description = "Unique value already taken", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Parents"
)]
#[instrument(skip(state, dto))]
pub async fn update_parent(
    State(state): State<AppState>,
    Path(id): Path<ParentId>,
    ValidatedJson(dto): ValidatedJson<UpdateParentDto>,
) -> Result<Json<AccountDetails<Parent>>, AppError> {
    let details = ProvisioningService::update_parent(&state.db, id, dto).await?;
    Ok(Json(details))
}
