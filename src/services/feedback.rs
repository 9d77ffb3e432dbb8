//! Member feedback calls

use crate::{
    error::AppResult,
    models::{
        feedback::{CreateFeedback, FeedbackQuery, MemberFeedback},
        page_params, PageMeta, UserClaims,
    },
    repository::Repository,
};

const DEFAULT_PAGE_SIZE: i64 = 20;

#[derive(Clone)]
pub struct FeedbackService {
    repository: Repository,
}

impl FeedbackService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record a follow-up call; the employee is then left out of prioritisation
    pub async fn create(&self, claims: &UserClaims, mut data: CreateFeedback) -> AppResult<MemberFeedback> {
        claims.require_manager()?;
        data.employee_id = data
            .employee_id
            .map(|e| e.trim().to_uppercase())
            .filter(|e| !e.is_empty());

        let feedback = self.repository.feedback.create(&data, claims.user_id).await?;
        tracing::info!(
            feedback_id = feedback.id,
            employee_id = feedback.employee_id.as_deref().unwrap_or_default(),
            "Member feedback recorded"
        );
        Ok(feedback)
    }

    pub async fn list(
        &self,
        claims: &UserClaims,
        query: &FeedbackQuery,
    ) -> AppResult<(Vec<MemberFeedback>, PageMeta)> {
        claims.require_manager()?;
        let (page, limit) = page_params(query.page, query.limit, DEFAULT_PAGE_SIZE);
        let employee_id = query
            .employee_id
            .as_deref()
            .map(|e| e.trim().to_uppercase())
            .filter(|e| !e.is_empty());
        let (items, total) = self
            .repository
            .feedback
            .list(employee_id.as_deref(), page, limit)
            .await?;
        Ok((items, PageMeta { total, page, limit }))
    }
}
