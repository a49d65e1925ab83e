//! Job message repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::message::{self, Entity as MessageEntity};
use crate::domain::Message;
use crate::errors::AppResult;

/// Message repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert(&self, job_id: Uuid, sender_id: Uuid, body: String) -> AppResult<Message>;

    async fn list_for_job(&self, job_id: Uuid) -> AppResult<Vec<Message>>;
}

/// SeaORM-backed implementation
pub struct MessageStore {
    db: DatabaseConnection,
}

impl MessageStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageRepository for MessageStore {
    async fn insert(&self, job_id: Uuid, sender_id: Uuid, body: String) -> AppResult<Message> {
        let active = message::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(job_id),
            sender_id: Set(sender_id),
            body: Set(body),
            read_at: Set(None),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active.insert(&self.db).await?;
        Ok(Message::from(model))
    }

    async fn list_for_job(&self, job_id: Uuid) -> AppResult<Vec<Message>> {
        let models = MessageEntity::find()
            .filter(message::Column::JobId.eq(job_id))
            .order_by_asc(message::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Message::from).collect())
    }
}
