//! API handlers for the clinic REST endpoints

pub mod auth;
pub mod employees;
pub mod feedback;
pub mod health;
pub mod hospitals;
pub mod ip_admissions;
pub mod isolations;
pub mod openapi;
pub mod patients;
pub mod professions;
pub mod visits;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{user::UserClaims, PageMeta},
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Not authenticated".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token.trim(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Paginated list wrapper
#[derive(Serialize, ToSchema)]
pub struct ListResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> From<(Vec<T>, PageMeta)> for ListResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    fn from((items, meta): (Vec<T>, PageMeta)) -> Self {
        Self { items, meta }
    }
}
