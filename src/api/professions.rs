//! Profession endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::profession::{CategoryMembers, CreateProfession, Profession, ProfessionMatches, ProfessionQuery},
    AppState,
};

use super::AuthenticatedUser;

#[utoipa::path(
    get,
    path = "/professions",
    tag = "professions",
    security(("bearer_auth" = [])),
    params(ProfessionQuery),
    responses(
        (status = 200, description = "Matching professions", body = ProfessionMatches)
    )
)]
pub async fn search_professions(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ProfessionQuery>,
) -> AppResult<Json<ProfessionMatches>> {
    let matches = state.services.professions.search(&query).await?;
    Ok(Json(matches))
}

#[utoipa::path(
    post,
    path = "/professions",
    tag = "professions",
    security(("bearer_auth" = [])),
    request_body = CreateProfession,
    responses(
        (status = 201, description = "Profession created", body = Profession),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_profession(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(data): Json<CreateProfession>,
) -> AppResult<(StatusCode, Json<Profession>)> {
    let profession = state.services.professions.create(data).await?;
    Ok((StatusCode::CREATED, Json(profession)))
}

#[utoipa::path(
    get,
    path = "/professions/categories",
    tag = "professions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Distinct categories, sorted", body = Vec<String>)
    )
)]
pub async fn list_categories(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<String>>> {
    let categories = state.services.professions.categories().await?;
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/professions/category/{name}",
    tag = "professions",
    security(("bearer_auth" = [])),
    params(("name" = String, Path, description = "Category name, any case")),
    responses(
        (status = 200, description = "Profession names in the category", body = CategoryMembers)
    )
)]
pub async fn category_members(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(name): Path<String>,
) -> AppResult<Json<CategoryMembers>> {
    let members = state.services.professions.in_category(&name).await?;
    Ok(Json(members))
}
