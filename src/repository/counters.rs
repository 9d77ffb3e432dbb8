//! Daily token counters repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{error::AppResult, services::tokens::CounterStore};

#[derive(Clone)]
pub struct CountersRepository {
    pool: Pool<Postgres>,
}

impl CountersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterStore for CountersRepository {
    async fn increment(&self, location_id: &str, date_key: &str) -> AppResult<i64> {
        // Single upsert statement; the row lock serialises concurrent callers
        let seq = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO daily_token_counters (location_id, date_key, seq)
            VALUES ($1, $2, 1)
            ON CONFLICT (location_id, date_key)
            DO UPDATE SET seq = daily_token_counters.seq + 1, updated_at = NOW()
            RETURNING seq
            "#,
        )
        .bind(location_id)
        .bind(date_key)
        .fetch_one(&self.pool)
        .await?;
        Ok(seq)
    }
}
