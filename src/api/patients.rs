//! Patient directory endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::patient::{Patient, PatientPayload, PatientQuery},
    AppState,
};

use super::{AuthenticatedUser, ListResponse};

#[utoipa::path(
    post,
    path = "/patients",
    tag = "patients",
    security(("bearer_auth" = [])),
    request_body = PatientPayload,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "empId already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_patient(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(payload): Json<PatientPayload>,
) -> AppResult<(StatusCode, Json<Patient>)> {
    let patient = state.services.patients.create(payload).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    get,
    path = "/patients",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(PatientQuery),
    responses(
        (status = 200, description = "Patients", body = ListResponse<Patient>)
    )
)]
pub async fn list_patients(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<PatientQuery>,
) -> AppResult<Json<ListResponse<Patient>>> {
    let page = state.services.patients.list(&query).await?;
    Ok(Json(page.into()))
}

/// All matching patients without pagination
#[utoipa::path(
    get,
    path = "/patients/all",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(PatientQuery),
    responses(
        (status = 200, description = "Patients", body = ListResponse<Patient>)
    )
)]
pub async fn all_patients(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<PatientQuery>,
) -> AppResult<Json<ListResponse<Patient>>> {
    let page = state.services.patients.list_all(&query).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/patients/emp/{emp_id}",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(("emp_id" = String, Path, description = "Employee ID, any case")),
    responses(
        (status = 200, description = "Patient", body = Patient),
        (status = 404, description = "Not found")
    )
)]
pub async fn patient_by_emp_id(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(emp_id): Path<String>,
) -> AppResult<Json<Patient>> {
    let patient = state.services.patients.by_emp_id(&emp_id).await?;
    Ok(Json(patient))
}

#[utoipa::path(
    get,
    path = "/patients/tr/{tr_location}",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(
        ("tr_location" = String, Path, description = "TR location"),
        PatientQuery
    ),
    responses(
        (status = 200, description = "Patients at the location", body = ListResponse<Patient>)
    )
)]
pub async fn patients_by_tr_location(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(tr_location): Path<String>,
    Query(query): Query<PatientQuery>,
) -> AppResult<Json<ListResponse<Patient>>> {
    let page = state
        .services
        .patients
        .by_tr_location(&tr_location, query)
        .await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Patient", body = Patient),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_patient(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Patient>> {
    let patient = state.services.patients.get(id).await?;
    Ok(Json(patient))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Patient ID")),
    request_body = PatientPayload,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_patient(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<PatientPayload>,
) -> AppResult<Json<Patient>> {
    let patient = state.services.patients.update(id, payload).await?;
    Ok(Json(patient))
}

#[utoipa::path(
    delete,
    path = "/patients/{id}",
    tag = "patients",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Patient ID")),
    responses(
        (status = 204, description = "Patient deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_patient(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.patients.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
