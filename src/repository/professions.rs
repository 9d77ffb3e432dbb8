//! Profession names repository

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::AppResult,
    models::profession::{CreateProfession, Profession},
};

#[derive(Clone)]
pub struct ProfessionsRepository {
    pool: Pool<Postgres>,
}

impl ProfessionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &CreateProfession) -> AppResult<Profession> {
        let row = sqlx::query_as::<_, Profession>(
            "INSERT INTO professions (name, category) VALUES ($1, $2) RETURNING id, name, category",
        )
        .bind(data.name.trim())
        .bind(data.category.as_deref().map(str::trim))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    fn build_search<'a>(
        words: &'a [String],
        category: Option<&'a str>,
        limit: i64,
    ) -> QueryBuilder<'a, Postgres> {
        let mut qb =
            QueryBuilder::<Postgres>::new("SELECT id, name, category FROM professions WHERE TRUE");
        for word in words {
            qb.push(" AND name ILIKE ").push_bind(format!("%{}%", word));
        }
        if let Some(category) = category {
            qb.push(" AND category = ").push_bind(category);
        }
        qb.push(" ORDER BY name ASC LIMIT ").push_bind(limit);
        qb
    }

    /// Names containing every word, case-insensitively
    pub async fn search(
        &self,
        words: &[String],
        category: Option<&str>,
        limit: i64,
    ) -> AppResult<Vec<Profession>> {
        let mut qb = Self::build_search(words, category, limit);
        let rows = qb.build_query_as::<Profession>().fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn categories(&self) -> AppResult<Vec<String>> {
        let rows = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM professions \
             WHERE category IS NOT NULL AND category <> '' ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Names in a category, matched case-insensitively
    pub async fn names_in_category(&self, category: &str) -> AppResult<Vec<String>> {
        let rows = sqlx::query_scalar::<_, String>(
            "SELECT name FROM professions WHERE LOWER(category) = LOWER($1) ORDER BY name",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_word_must_match() {
        let words = vec!["heavy".to_string(), "driver".to_string()];
        let qb = ProfessionsRepository::build_search(&words, Some("Transport"), 10);
        assert_eq!(
            qb.sql(),
            "SELECT id, name, category FROM professions WHERE TRUE \
             AND name ILIKE $1 AND name ILIKE $2 AND category = $3 ORDER BY name ASC LIMIT $4"
        );
    }
}
