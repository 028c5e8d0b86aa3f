//! PostgreSQL progress store

use async_trait::async_trait;
use hifz_core::{FeatureKey, ProgressStore, StoreError, Versioned};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};

/// Stored progress document row
#[derive(Debug, Clone, FromRow)]
struct ProgressRow {
    data: Value,
    version: i64,
}

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn current_version(
        &self,
        user_id: Uuid,
        feature: FeatureKey,
    ) -> std::result::Result<Option<u64>, StoreError> {
        let version: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT version FROM progress_records
            WHERE user_id = $1 AND feature = $2
            "#,
        )
        .bind(user_id)
        .bind(feature.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(version.map(|v| v as u64))
    }
}

fn unavailable(error: sqlx::Error) -> StoreError {
    StoreError::Unavailable(error.to_string())
}

#[async_trait]
impl ProgressStore for Database {
    async fn load(
        &self,
        user_id: Uuid,
        feature: FeatureKey,
    ) -> std::result::Result<Option<Versioned<Value>>, StoreError> {
        let row = sqlx::query_as::<_, ProgressRow>(
            r#"
            SELECT data, version FROM progress_records
            WHERE user_id = $1 AND feature = $2
            "#,
        )
        .bind(user_id)
        .bind(feature.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(unavailable)?;

        Ok(row.map(|row| Versioned {
            data: row.data,
            version: row.version as u64,
        }))
    }

    async fn save(
        &self,
        user_id: Uuid,
        feature: FeatureKey,
        data: Value,
        expected_version: Option<u64>,
    ) -> std::result::Result<u64, StoreError> {
        let saved: Option<i64> = match expected_version {
            None => sqlx::query_scalar(
                r#"
                INSERT INTO progress_records (user_id, feature, data)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, feature) DO NOTHING
                RETURNING version
                "#,
            )
            .bind(user_id)
            .bind(feature.as_str())
            .bind(&data)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?,
            Some(expected) => sqlx::query_scalar(
                r#"
                UPDATE progress_records
                SET data = $3, version = version + 1, updated_at = NOW()
                WHERE user_id = $1 AND feature = $2 AND version = $4
                RETURNING version
                "#,
            )
            .bind(user_id)
            .bind(feature.as_str())
            .bind(&data)
            .bind(expected as i64)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?,
        };

        match saved {
            Some(version) => Ok(version as u64),
            None => Err(StoreError::Conflict {
                expected: expected_version,
                actual: self.current_version(user_id, feature).await?,
            }),
        }
    }
}
