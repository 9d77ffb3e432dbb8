//! Profession lookup

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::profession::{CategoryMembers, CreateProfession, Profession, ProfessionMatches, ProfessionQuery},
    repository::Repository,
};

const DEFAULT_SEARCH_LIMIT: i64 = 10;

#[derive(Clone)]
pub struct ProfessionsService {
    repository: Repository,
}

impl ProfessionsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create(&self, data: CreateProfession) -> AppResult<Profession> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.professions.create(&data).await
    }

    /// Autocomplete; an empty search returns nothing
    pub async fn search(&self, query: &ProfessionQuery) -> AppResult<ProfessionMatches> {
        let words = query.words();
        if words.is_empty() {
            return Ok(ProfessionMatches { count: 0, data: Vec::new() });
        }
        let limit = query.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).max(1);
        let category = query.category.as_deref().filter(|c| !c.trim().is_empty());
        let data = self.repository.professions.search(&words, category, limit).await?;
        Ok(ProfessionMatches { count: data.len(), data })
    }

    pub async fn categories(&self) -> AppResult<Vec<String>> {
        self.repository.professions.categories().await
    }

    pub async fn in_category(&self, category: &str) -> AppResult<CategoryMembers> {
        let category = category.trim();
        if category.is_empty() {
            return Err(AppError::BadRequest("Category name is required".to_string()));
        }
        let data = self.repository.professions.names_in_category(category).await?;
        Ok(CategoryMembers {
            category: category.to_string(),
            count: data.len(),
            data,
        })
    }
}
