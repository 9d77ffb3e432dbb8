//! Redis-backed daily token counters

use async_trait::async_trait;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client};

use crate::{
    error::{AppError, AppResult},
    services::tokens::CounterStore,
};

#[derive(Clone)]
pub struct RedisService {
    client: Client,
}

impl RedisService {
    /// Create a new Redis service
    pub async fn new(url: &str) -> AppResult<Self> {
        let client = Client::open(url)
            .map_err(|e| AppError::Internal(format!("Failed to create Redis client: {}", e)))?;

        // Test connection
        let mut conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to connect to Redis: {}", e)))?;

        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection test failed: {}", e)))?;

        Ok(Self { client })
    }

    async fn connection(&self) -> AppResult<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to get Redis connection: {}", e)))
    }

    /// Key holding the counter for a location and day
    pub fn counter_key(location_id: &str, date_key: &str) -> String {
        format!("token_seq:{}:{}", location_id, date_key)
    }
}

#[async_trait]
impl CounterStore for RedisService {
    async fn increment(&self, location_id: &str, date_key: &str) -> AppResult<i64> {
        let mut conn = self.connection().await?;
        // INCR creates missing keys at zero before incrementing
        let seq: i64 = conn
            .incr(Self::counter_key(location_id, date_key), 1)
            .await?;
        Ok(seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_key() {
        assert_eq!(
            RedisService::counter_key("AL QOUZ", "2025-12-05"),
            "token_seq:AL QOUZ:2025-12-05"
        );
    }
}
