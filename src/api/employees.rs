//! Employee record endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::employee::{EmployeePayload, EmployeeQuery, EmployeeRecord, LeaveEligibility},
    AppState,
};

use super::{AuthenticatedUser, ListResponse};

#[utoipa::path(
    post,
    path = "/employees",
    tag = "employees",
    security(("bearer_auth" = [])),
    request_body = EmployeePayload,
    responses(
        (status = 201, description = "Employee record created", body = EmployeeRecord),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_employee(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(payload): Json<EmployeePayload>,
) -> AppResult<(StatusCode, Json<EmployeeRecord>)> {
    let record = state.services.employees.create(payload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/employees",
    tag = "employees",
    security(("bearer_auth" = [])),
    params(EmployeeQuery),
    responses(
        (status = 200, description = "Employee records", body = ListResponse<EmployeeRecord>)
    )
)]
pub async fn list_employees(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<EmployeeQuery>,
) -> AppResult<Json<ListResponse<EmployeeRecord>>> {
    let page = state.services.employees.list(&query).await?;
    Ok(Json(page.into()))
}

/// Leave eligibility from the employee's latest record
#[utoipa::path(
    get,
    path = "/employees/{id}/leave-eligibility",
    tag = "employees",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Employee number")),
    responses(
        (status = 200, description = "Eligibility", body = LeaveEligibility),
        (status = 404, description = "No record for this employee")
    )
)]
pub async fn leave_eligibility(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(emp_no): Path<String>,
) -> AppResult<Json<LeaveEligibility>> {
    let eligibility = state.services.employees.leave_eligibility(&emp_no).await?;
    Ok(Json(eligibility))
}

#[utoipa::path(
    get,
    path = "/employees/{id}",
    tag = "employees",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Employee record ID")),
    responses(
        (status = 200, description = "Employee record", body = EmployeeRecord),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_employee(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<EmployeeRecord>> {
    let record = state.services.employees.get(id).await?;
    Ok(Json(record))
}

#[utoipa::path(
    put,
    path = "/employees/{id}",
    tag = "employees",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Employee record ID")),
    request_body = EmployeePayload,
    responses(
        (status = 200, description = "Employee record updated", body = EmployeeRecord),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_employee(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<EmployeePayload>,
) -> AppResult<Json<EmployeeRecord>> {
    let record = state.services.employees.update(id, payload).await?;
    Ok(Json(record))
}

#[utoipa::path(
    delete,
    path = "/employees/{id}",
    tag = "employees",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Employee record ID")),
    responses(
        (status = 204, description = "Employee record deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.employees.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
