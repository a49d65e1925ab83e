//! Voucher code repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::voucher_code::{self, Entity as VoucherEntity};
use crate::domain::{DiscountKind, Voucher};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// New voucher row
#[derive(Debug, Clone)]
pub struct NewVoucher {
    pub code: String,
    pub kind: DiscountKind,
    pub value: i64,
    pub max_uses: i32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub active: bool,
}

/// Voucher repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait VoucherRepository: Send + Sync {
    async fn insert(&self, voucher: NewVoucher) -> AppResult<Voucher>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Voucher>>;

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Voucher>>;

    async fn update(
        &self,
        id: Uuid,
        active: Option<bool>,
        max_uses: Option<i32>,
        valid_until: Option<DateTime<Utc>>,
    ) -> AppResult<Voucher>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Voucher>, u64)>;
}

/// SeaORM-backed implementation
pub struct VoucherStore {
    db: DatabaseConnection,
}

impl VoucherStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl VoucherRepository for VoucherStore {
    async fn insert(&self, voucher: NewVoucher) -> AppResult<Voucher> {
        let now = Utc::now();
        let active = voucher_code::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(voucher.code),
            discount_kind: Set(voucher.kind.to_string()),
            discount_value: Set(voucher.value),
            max_uses: Set(voucher.max_uses),
            used_count: Set(0),
            valid_from: Set(voucher.valid_from),
            valid_until: Set(voucher.valid_until),
            active: Set(voucher.active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        Ok(Voucher::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Voucher>> {
        let model = VoucherEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Voucher::from))
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Voucher>> {
        let model = VoucherEntity::find()
            .filter(voucher_code::Column::Code.eq(code))
            .one(&self.db)
            .await?;
        Ok(model.map(Voucher::from))
    }

    async fn update(
        &self,
        id: Uuid,
        active: Option<bool>,
        max_uses: Option<i32>,
        valid_until: Option<DateTime<Utc>>,
    ) -> AppResult<Voucher> {
        let model = VoucherEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut model_active: voucher_code::ActiveModel = model.into();
        if let Some(active) = active {
            model_active.active = Set(active);
        }
        if let Some(max_uses) = max_uses {
            model_active.max_uses = Set(max_uses);
        }
        if let Some(valid_until) = valid_until {
            model_active.valid_until = Set(valid_until);
        }
        model_active.updated_at = Set(Utc::now());

        let model = model_active.update(&self.db).await?;
        Ok(Voucher::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = VoucherEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list(&self, params: &PaginationParams) -> AppResult<(Vec<Voucher>, u64)> {
        let paginator = VoucherEntity::find()
            .order_by_desc(voucher_code::Column::CreatedAt)
            .paginate(&self.db, params.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;
        Ok((models.into_iter().map(Voucher::from).collect(), total))
    }
}
