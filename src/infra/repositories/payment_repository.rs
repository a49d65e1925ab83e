//! Payment record repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::payment::{self, Entity as PaymentEntity};
use crate::domain::{Payment, PaymentStatus};
use crate::errors::{AppError, AppResult};

/// Payment repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn insert(
        &self,
        order_id: Uuid,
        provider_intent_id: String,
        amount_cents: i64,
        currency: String,
        status: PaymentStatus,
    ) -> AppResult<Payment>;

    /// Latest payment attempt for an order
    async fn find_for_order(&self, order_id: Uuid) -> AppResult<Option<Payment>>;

    async fn set_status(&self, id: Uuid, status: PaymentStatus) -> AppResult<Payment>;
}

/// SeaORM-backed implementation
pub struct PaymentStore {
    db: DatabaseConnection,
}

impl PaymentStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentRepository for PaymentStore {
    async fn insert(
        &self,
        order_id: Uuid,
        provider_intent_id: String,
        amount_cents: i64,
        currency: String,
        status: PaymentStatus,
    ) -> AppResult<Payment> {
        let now = chrono::Utc::now();
        let active = payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            provider_intent_id: Set(provider_intent_id),
            amount_cents: Set(amount_cents),
            currency: Set(currency),
            status: Set(status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        Ok(Payment::from(model))
    }

    async fn find_for_order(&self, order_id: Uuid) -> AppResult<Option<Payment>> {
        let model = PaymentEntity::find()
            .filter(payment::Column::OrderId.eq(order_id))
            .order_by_desc(payment::Column::CreatedAt)
            .one(&self.db)
            .await?;
        Ok(model.map(Payment::from))
    }

    async fn set_status(&self, id: Uuid, status: PaymentStatus) -> AppResult<Payment> {
        let model = PaymentEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: payment::ActiveModel = model.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Payment::from(model))
    }
}
