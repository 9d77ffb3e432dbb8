//! Isolation record endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        isolation::{Isolation, IsolationPayload, IsolationQuery},
        visit::PageQuery,
    },
    AppState,
};

use super::{AuthenticatedUser, ListResponse};

#[utoipa::path(
    post,
    path = "/isolations",
    tag = "isolations",
    security(("bearer_auth" = [])),
    request_body = IsolationPayload,
    responses(
        (status = 201, description = "Isolation record created", body = Isolation),
        (status = 400, description = "Missing required fields", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_isolation(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(payload): Json<IsolationPayload>,
) -> AppResult<(StatusCode, Json<Isolation>)> {
    let isolation = state.services.isolations.create(&claims, payload).await?;
    Ok((StatusCode::CREATED, Json(isolation)))
}

#[utoipa::path(
    get,
    path = "/isolations",
    tag = "isolations",
    security(("bearer_auth" = [])),
    params(IsolationQuery),
    responses(
        (status = 200, description = "Isolation records", body = ListResponse<Isolation>)
    )
)]
pub async fn list_isolations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<IsolationQuery>,
) -> AppResult<Json<ListResponse<Isolation>>> {
    let page = state.services.isolations.list(&claims, &query).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/isolations/my-location",
    tag = "isolations",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Isolation records at the caller's location", body = ListResponse<Isolation>),
        (status = 400, description = "User has no locationId")
    )
)]
pub async fn my_location_isolations(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ListResponse<Isolation>>> {
    let page = state
        .services
        .isolations
        .my_location(&claims, query.page, query.limit)
        .await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/isolations/{id}",
    tag = "isolations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Isolation record ID")),
    responses(
        (status = 200, description = "Isolation record", body = Isolation),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_isolation(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Isolation>> {
    let isolation = state.services.isolations.get(id).await?;
    Ok(Json(isolation))
}

#[utoipa::path(
    put,
    path = "/isolations/{id}",
    tag = "isolations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Isolation record ID")),
    request_body = IsolationPayload,
    responses(
        (status = 200, description = "Isolation record updated", body = Isolation),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_isolation(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<IsolationPayload>,
) -> AppResult<Json<Isolation>> {
    let isolation = state.services.isolations.update(id, payload).await?;
    Ok(Json(isolation))
}

#[utoipa::path(
    delete,
    path = "/isolations/{id}",
    tag = "isolations",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Isolation record ID")),
    responses(
        (status = 200, description = "Deleted isolation record", body = Isolation),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_isolation(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Isolation>> {
    let isolation = state.services.isolations.delete(id).await?;
    Ok(Json(isolation))
}
