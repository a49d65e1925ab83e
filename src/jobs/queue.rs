//! Email job queue.
//!
//! Services enqueue through the `EmailQueue` trait; the worker drains
//! the Postgres-backed queue out of process.

use apalis::prelude::Storage;
use apalis_sql::postgres::PostgresStorage;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::EmailJob;
use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Queue trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait EmailQueue: Send + Sync {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()>;
}

/// apalis Postgres-backed queue.
pub struct PostgresEmailQueue {
    // apalis push requires &mut; the storage handle is cheap to lock
    storage: Mutex<PostgresStorage<EmailJob>>,
}

impl PostgresEmailQueue {
    pub fn new(storage: PostgresStorage<EmailJob>) -> Self {
        Self {
            storage: Mutex::new(storage),
        }
    }

    /// Connect a dedicated pool and ensure the apalis schema exists.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        use apalis_sql::sqlx::postgres::PgPoolOptions;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&config.database_url)
            .await
            .map_err(|e| AppError::internal(format!("Failed to connect job storage: {}", e)))?;

        PostgresStorage::setup(&pool)
            .await
            .map_err(|e| AppError::internal(format!("Failed to setup job storage: {}", e)))?;

        Ok(Self::new(PostgresStorage::new(pool)))
    }
}

#[async_trait]
impl EmailQueue for PostgresEmailQueue {
    async fn enqueue(&self, job: EmailJob) -> AppResult<()> {
        let mut storage = self.storage.lock().await;
        storage
            .push(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to enqueue email: {}", e)))?;
        Ok(())
    }
}
