//! Clinic visit endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        report::{EmployeeSummary, HistoryEntry, PrioritizedResponse},
        visit::{ClinicVisit, EmployeeInfo, PageQuery, VisitPayload, VisitQuery, VisitSearchQuery},
    },
    AppState,
};

use super::{AuthenticatedUser, ListResponse};

/// Record a clinic visit; a token is generated when none is supplied
#[utoipa::path(
    post,
    path = "/visits",
    tag = "visits",
    security(("bearer_auth" = [])),
    request_body = VisitPayload,
    responses(
        (status = 201, description = "Visit created", body = ClinicVisit),
        (status = 400, description = "Missing required fields", body = crate::error::ErrorResponse),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_visit(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<VisitPayload>,
) -> AppResult<(StatusCode, Json<ClinicVisit>)> {
    let visit = state.services.visits.create(&claims, payload).await?;
    Ok((StatusCode::CREATED, Json(visit)))
}

/// List visits within the caller's location scope
#[utoipa::path(
    get,
    path = "/visits",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(VisitQuery),
    responses(
        (status = 200, description = "Visits", body = ListResponse<ClinicVisit>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_visits(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<VisitQuery>,
) -> AppResult<Json<ListResponse<ClinicVisit>>> {
    let page = state.services.visits.list(&claims, &query).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/visits/my-location",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Visits at the caller's location", body = ListResponse<ClinicVisit>),
        (status = 400, description = "User has no locationId")
    )
)]
pub async fn my_location_visits(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ListResponse<ClinicVisit>>> {
    let page = state
        .services
        .visits
        .my_location(&claims, query.page, query.limit)
        .await?;
    Ok(Json(page.into()))
}

/// Search visits by employee number and/or date
#[utoipa::path(
    get,
    path = "/visits/search",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(VisitSearchQuery),
    responses(
        (status = 200, description = "Matching visits", body = Vec<ClinicVisit>),
        (status = 400, description = "Neither empNo nor date given")
    )
)]
pub async fn search_visits(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<VisitSearchQuery>,
) -> AppResult<Json<Vec<ClinicVisit>>> {
    let visits = state
        .services
        .visits
        .search(&claims, query.emp_no.as_deref(), query.date.as_deref())
        .await?;
    Ok(Json(visits))
}

/// Employees at the manager's locations ranked for follow-up
#[utoipa::path(
    get,
    path = "/visits/manager/prioritized",
    tag = "visits",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Prioritized visits", body = PrioritizedResponse),
        (status = 403, description = "Not a manager or no assigned locations")
    )
)]
pub async fn manager_prioritized(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<PrioritizedResponse>> {
    claims.require_manager()?;
    let response = state.services.reports.manager_prioritized(&claims).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/visits/employee-info/{token_no}",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("token_no" = String, Path, description = "Visit token")),
    responses(
        (status = 200, description = "Employee details", body = EmployeeInfo),
        (status = 404, description = "Employee not found for this token")
    )
)]
pub async fn employee_info(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(token_no): Path<String>,
) -> AppResult<Json<EmployeeInfo>> {
    let info = state.services.visits.employee_info(&token_no).await?;
    Ok(Json(info))
}

#[utoipa::path(
    get,
    path = "/visits/employees/{emp_no}/summary",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("emp_no" = String, Path, description = "Employee number")),
    responses(
        (status = 200, description = "Visit summary", body = EmployeeSummary)
    )
)]
pub async fn employee_summary(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(emp_no): Path<String>,
) -> AppResult<Json<EmployeeSummary>> {
    let summary = state.services.reports.employee_summary(&emp_no).await?;
    Ok(Json(summary))
}

#[utoipa::path(
    get,
    path = "/visits/employees/{emp_no}/history",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("emp_no" = String, Path, description = "Employee number")),
    responses(
        (status = 200, description = "Diagnosis history of the last 90 days", body = Vec<HistoryEntry>)
    )
)]
pub async fn employee_history(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(emp_no): Path<String>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    let history = state.services.reports.employee_history(&emp_no).await?;
    Ok(Json(history))
}

#[utoipa::path(
    get,
    path = "/visits/{id}",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Visit ID")),
    responses(
        (status = 200, description = "Visit", body = ClinicVisit),
        (status = 404, description = "Visit not found")
    )
)]
pub async fn get_visit(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ClinicVisit>> {
    let visit = state.services.visits.get(id).await?;
    Ok(Json(visit))
}

#[utoipa::path(
    put,
    path = "/visits/{id}",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Visit ID")),
    request_body = VisitPayload,
    responses(
        (status = 200, description = "Visit updated", body = ClinicVisit),
        (status = 404, description = "Visit not found")
    )
)]
pub async fn update_visit(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<VisitPayload>,
) -> AppResult<Json<ClinicVisit>> {
    let visit = state.services.visits.update(id, payload).await?;
    Ok(Json(visit))
}

#[utoipa::path(
    delete,
    path = "/visits/{id}",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Visit ID")),
    responses(
        (status = 200, description = "Deleted visit", body = ClinicVisit),
        (status = 404, description = "Visit not found")
    )
)]
pub async fn delete_visit(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ClinicVisit>> {
    let visit = state.services.visits.delete(id).await?;
    Ok(Json(visit))
}
