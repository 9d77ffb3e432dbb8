//! H&I inpatient admission endpoints (manager or superadmin only)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::ip_admission::{IpAdmission, IpAdmissionPayload, IpAdmissionQuery, IpAdmissionWithName},
    AppState,
};

use super::{AuthenticatedUser, ListResponse};

#[utoipa::path(
    post,
    path = "/ip-admissions",
    tag = "ip-admissions",
    security(("bearer_auth" = [])),
    request_body = IpAdmissionPayload,
    responses(
        (status = 201, description = "IP admission created", body = IpAdmission),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Referenced hospitalCase not found")
    )
)]
pub async fn create_ip_admission(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<IpAdmissionPayload>,
) -> AppResult<(StatusCode, Json<IpAdmission>)> {
    let admission = state.services.ip_admissions.create(&claims, payload).await?;
    Ok((StatusCode::CREATED, Json(admission)))
}

/// Open an IP admission from a hospital record
#[utoipa::path(
    post,
    path = "/ip-admissions/from-hospital-case",
    tag = "ip-admissions",
    security(("bearer_auth" = [])),
    request_body = IpAdmissionPayload,
    responses(
        (status = 201, description = "IP admission created", body = IpAdmissionWithName),
        (status = 400, description = "hospitalCase is required"),
        (status = 404, description = "Referenced hospitalCase not found"),
        (status = 422, description = "hiManagers and caseTypeChange are required")
    )
)]
pub async fn create_from_hospital_case(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<IpAdmissionPayload>,
) -> AppResult<(StatusCode, Json<IpAdmissionWithName>)> {
    let admission = state
        .services
        .ip_admissions
        .create_from_hospital_case(&claims, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(admission)))
}

/// Manual entry for an employee not in the hospital records
#[utoipa::path(
    post,
    path = "/ip-admissions/employee-not-in-his",
    tag = "ip-admissions",
    security(("bearer_auth" = [])),
    request_body = IpAdmissionPayload,
    responses(
        (status = 201, description = "IP admission created", body = IpAdmission),
        (status = 422, description = "A required field is missing")
    )
)]
pub async fn create_manual(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<IpAdmissionPayload>,
) -> AppResult<(StatusCode, Json<IpAdmission>)> {
    let admission = state.services.ip_admissions.create_manual(&claims, payload).await?;
    Ok((StatusCode::CREATED, Json(admission)))
}

#[utoipa::path(
    get,
    path = "/ip-admissions",
    tag = "ip-admissions",
    security(("bearer_auth" = [])),
    params(IpAdmissionQuery),
    responses(
        (status = 200, description = "IP admissions", body = ListResponse<IpAdmission>),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_ip_admissions(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<IpAdmissionQuery>,
) -> AppResult<Json<ListResponse<IpAdmission>>> {
    let page = state.services.ip_admissions.list(&claims, &query).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/ip-admissions/{id}",
    tag = "ip-admissions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "IP admission ID")),
    responses(
        (status = 200, description = "IP admission", body = IpAdmission),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_ip_admission(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<IpAdmission>> {
    let admission = state.services.ip_admissions.get(&claims, id).await?;
    Ok(Json(admission))
}

#[utoipa::path(
    put,
    path = "/ip-admissions/{id}",
    tag = "ip-admissions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "IP admission ID")),
    request_body = IpAdmissionPayload,
    responses(
        (status = 200, description = "IP admission updated", body = IpAdmission),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_ip_admission(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<IpAdmissionPayload>,
) -> AppResult<Json<IpAdmission>> {
    let admission = state.services.ip_admissions.update(&claims, id, payload).await?;
    Ok(Json(admission))
}

#[utoipa::path(
    delete,
    path = "/ip-admissions/{id}",
    tag = "ip-admissions",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "IP admission ID")),
    responses(
        (status = 200, description = "Deleted IP admission", body = IpAdmission),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_ip_admission(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<IpAdmission>> {
    let admission = state.services.ip_admissions.delete(&claims, id).await?;
    Ok(Json(admission))
}
