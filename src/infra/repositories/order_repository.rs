//! Design package order repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::design_package_order::{self, Entity as OrderEntity};
use crate::domain::{DesignPackageOrder, OrderStatus};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Listing scope derived from the caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    All,
    Client(Uuid),
}

/// Order repository trait for dependency injection.
///
/// Order creation happens inside a transaction context, so this trait
/// only covers reads and status changes.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DesignPackageOrder>>;

    async fn list(
        &self,
        scope: OrderScope,
        params: &PaginationParams,
    ) -> AppResult<(Vec<DesignPackageOrder>, u64)>;

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> AppResult<DesignPackageOrder>;
}

/// SeaORM-backed implementation
pub struct OrderStore {
    db: DatabaseConnection,
}

impl OrderStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DesignPackageOrder>> {
        let model = OrderEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(DesignPackageOrder::from))
    }

    async fn list(
        &self,
        scope: OrderScope,
        params: &PaginationParams,
    ) -> AppResult<(Vec<DesignPackageOrder>, u64)> {
        let mut query = OrderEntity::find();
        if let OrderScope::Client(client_id) = scope {
            query = query.filter(design_package_order::Column::ClientId.eq(client_id));
        }

        let paginator = query
            .order_by_desc(design_package_order::Column::CreatedAt)
            .paginate(&self.db, params.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;
        Ok((
            models.into_iter().map(DesignPackageOrder::from).collect(),
            total,
        ))
    }

    async fn set_status(&self, id: Uuid, status: OrderStatus) -> AppResult<DesignPackageOrder> {
        let model = OrderEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: design_package_order::ActiveModel = model.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(DesignPackageOrder::from(model))
    }
}
