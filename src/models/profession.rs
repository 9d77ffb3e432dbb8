//! Profession names used for autocomplete, grouped by category

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Profession {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateProfession {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    pub category: Option<String>,
}

/// Autocomplete query; every word of `search` must appear in the name
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ProfessionQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub limit: Option<i64>,
}

impl ProfessionQuery {
    /// Whitespace-separated search words
    pub fn words(&self) -> Vec<String> {
        self.search
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProfessionMatches {
    pub count: usize,
    pub data: Vec<Profession>,
}

/// Every profession name within one category
#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryMembers {
    pub category: String,
    pub count: usize,
    pub data: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_words() {
        let q = ProfessionQuery {
            search: Some("  heavy   driver ".into()),
            ..Default::default()
        };
        assert_eq!(q.words(), vec!["heavy", "driver"]);
        assert!(ProfessionQuery::default().words().is_empty());
    }
}
