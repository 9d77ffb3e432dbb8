//! Member feedback endpoints

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::feedback::{CreateFeedback, FeedbackQuery, MemberFeedback},
    AppState,
};

use super::{AuthenticatedUser, ListResponse};

#[utoipa::path(
    post,
    path = "/member-feedback",
    tag = "member-feedback",
    security(("bearer_auth" = [])),
    request_body = CreateFeedback,
    responses(
        (status = 201, description = "Feedback recorded", body = MemberFeedback),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn create_feedback(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<CreateFeedback>,
) -> AppResult<(StatusCode, Json<MemberFeedback>)> {
    let feedback = state.services.feedback.create(&claims, data).await?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

#[utoipa::path(
    get,
    path = "/member-feedback",
    tag = "member-feedback",
    security(("bearer_auth" = [])),
    params(FeedbackQuery),
    responses(
        (status = 200, description = "Feedback calls", body = ListResponse<MemberFeedback>),
        (status = 403, description = "Forbidden")
    )
)]
pub async fn list_feedback(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<FeedbackQuery>,
) -> AppResult<Json<ListResponse<MemberFeedback>>> {
    let page = state.services.feedback.list(&claims, &query).await?;
    Ok(Json(page.into()))
}
