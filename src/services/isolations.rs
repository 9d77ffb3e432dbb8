//! Isolation records service

use crate::{
    error::{AppError, AppResult},
    models::{
        isolation::{Isolation, IsolationPayload, IsolationQuery},
        page_params, LocationScope, PageMeta, UserClaims,
    },
    repository::Repository,
};

const DEFAULT_PAGE_SIZE: i64 = 20;
const LOCATION_PAGE_SIZE: i64 = 50;

#[derive(Clone)]
pub struct IsolationsService {
    repository: Repository,
}

impl IsolationsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, claims: &UserClaims, mut payload: IsolationPayload) -> AppResult<Isolation> {
        let missing = payload.missing_fields();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        payload.normalize();
        if let Some(location) = claims.own_location() {
            payload.location_id = Some(location.to_string());
        }

        let isolation = self.repository.isolations.create(&payload, claims.user_id).await?;
        tracing::info!(isolation_id = isolation.id, "Isolation record created");
        Ok(isolation)
    }

    pub async fn list(
        &self,
        claims: &UserClaims,
        query: &IsolationQuery,
    ) -> AppResult<(Vec<Isolation>, PageMeta)> {
        let (page, limit) = page_params(query.page, query.limit, DEFAULT_PAGE_SIZE);
        let scope = claims.scope(query.location_id.as_deref());
        let (items, total) = self
            .repository
            .isolations
            .list(&scope, query, page, limit)
            .await?;
        Ok((items, PageMeta { total, page, limit }))
    }

    pub async fn get(&self, id: i32) -> AppResult<Isolation> {
        self.repository.isolations.get_by_id(id).await
    }

    pub async fn update(&self, id: i32, mut payload: IsolationPayload) -> AppResult<Isolation> {
        payload.normalize();
        self.repository.isolations.update(id, &payload).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<Isolation> {
        let isolation = self.repository.isolations.delete(id).await?;
        tracing::info!(isolation_id = id, "Isolation record deleted");
        Ok(isolation)
    }

    /// Isolation records at the caller's own location
    pub async fn my_location(
        &self,
        claims: &UserClaims,
        page: Option<i64>,
        limit: Option<i64>,
    ) -> AppResult<(Vec<Isolation>, PageMeta)> {
        let location = claims.require_location()?;
        let (page, limit) = page_params(page, limit, LOCATION_PAGE_SIZE);
        let scope = LocationScope::Only(vec![location.to_string()]);
        let (items, total) = self
            .repository
            .isolations
            .list(&scope, &IsolationQuery::default(), page, limit)
            .await?;
        Ok((items, PageMeta { total, page, limit }))
    }
}
