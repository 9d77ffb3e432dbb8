//! Hospital admission endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        hospital::{Hospital, HospitalEmployeeQuery, HospitalPayload, HospitalQuery},
        visit::PageQuery,
    },
    AppState,
};

use super::{AuthenticatedUser, ListResponse};

#[utoipa::path(
    post,
    path = "/hospitals",
    tag = "hospitals",
    security(("bearer_auth" = [])),
    request_body = HospitalPayload,
    responses(
        (status = 201, description = "Hospital record created", body = Hospital),
        (status = 400, description = "Missing required fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_hospital(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<HospitalPayload>,
) -> AppResult<(StatusCode, Json<Hospital>)> {
    let hospital = state.services.hospitals.create(&claims, payload).await?;
    Ok((StatusCode::CREATED, Json(hospital)))
}

#[utoipa::path(
    get,
    path = "/hospitals",
    tag = "hospitals",
    security(("bearer_auth" = [])),
    params(HospitalQuery),
    responses(
        (status = 200, description = "Hospital records", body = ListResponse<Hospital>)
    )
)]
pub async fn list_hospitals(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<HospitalQuery>,
) -> AppResult<Json<ListResponse<Hospital>>> {
    let page = state.services.hospitals.list(&claims, &query).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/hospitals/my-location",
    tag = "hospitals",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Hospital records at the caller's location", body = ListResponse<Hospital>),
        (status = 400, description = "User has no locationId")
    )
)]
pub async fn my_location_hospitals(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ListResponse<Hospital>>> {
    let page = state
        .services
        .hospitals
        .my_location(&claims, query.page, query.limit)
        .await?;
    Ok(Json(page.into()))
}

/// Admissions still awaiting an H&I decision at the manager's locations
#[utoipa::path(
    get,
    path = "/hospitals/manager/discharge-status",
    tag = "hospitals",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Pending admissions", body = ListResponse<Hospital>),
        (status = 400, description = "Manager has no assigned locations"),
        (status = 403, description = "Not a manager")
    )
)]
pub async fn discharge_status(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ListResponse<Hospital>>> {
    let page = state
        .services
        .hospitals
        .discharge_pending(&claims, query.page, query.limit)
        .await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/hospitals/employee/search",
    tag = "hospitals",
    security(("bearer_auth" = [])),
    params(HospitalEmployeeQuery),
    responses(
        (status = 200, description = "Admission on that day", body = Hospital),
        (status = 400, description = "empNo or date missing"),
        (status = 404, description = "No hospital record found")
    )
)]
pub async fn employee_search(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<HospitalEmployeeQuery>,
) -> AppResult<Json<Hospital>> {
    let hospital = state
        .services
        .hospitals
        .find_by_employee_and_date(query.emp_no.as_deref(), query.date.as_deref())
        .await?;
    Ok(Json(hospital))
}

#[utoipa::path(
    get,
    path = "/hospitals/{id}",
    tag = "hospitals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Hospital record ID")),
    responses(
        (status = 200, description = "Hospital record", body = Hospital),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_hospital(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Hospital>> {
    let hospital = state.services.hospitals.get(id).await?;
    Ok(Json(hospital))
}

#[utoipa::path(
    put,
    path = "/hospitals/{id}",
    tag = "hospitals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Hospital record ID")),
    request_body = HospitalPayload,
    responses(
        (status = 200, description = "Hospital record updated", body = Hospital),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_hospital(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<HospitalPayload>,
) -> AppResult<Json<Hospital>> {
    let hospital = state.services.hospitals.update(id, payload).await?;
    Ok(Json(hospital))
}

#[utoipa::path(
    delete,
    path = "/hospitals/{id}",
    tag = "hospitals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Hospital record ID")),
    responses(
        (status = 200, description = "Deleted hospital record", body = Hospital),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_hospital(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Hospital>> {
    let hospital = state.services.hospitals.delete(id).await?;
    Ok(Json(hospital))
}
