//! Product pricing and tier repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::pricing_tier::{self, Entity as TierEntity};
use super::entities::product_pricing::{self, Entity as ProductEntity};
use crate::domain::{PricingTier, ProductPricing};
use crate::errors::{AppError, AppResult};

/// New product row
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub product_key: String,
    pub display_name: String,
    pub base_price_cents: i64,
    pub active: bool,
}

/// New tier row (product assigned by `replace_tiers`)
#[derive(Debug, Clone)]
pub struct NewTier {
    pub min_quantity: i32,
    pub unit_price_cents: i64,
}

/// Pricing repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait PricingRepository: Send + Sync {
    async fn insert_product(&self, product: NewProduct) -> AppResult<ProductPricing>;

    async fn find_product_by_key(&self, product_key: &str) -> AppResult<Option<ProductPricing>>;

    async fn list_products(&self) -> AppResult<Vec<ProductPricing>>;

    async fn update_product(
        &self,
        product_key: &str,
        display_name: Option<String>,
        base_price_cents: Option<i64>,
        active: Option<bool>,
    ) -> AppResult<ProductPricing>;

    /// Deletes the product and, via cascade, its tiers
    async fn delete_product(&self, product_key: &str) -> AppResult<()>;

    /// Replace the product's tier set wholesale
    async fn replace_tiers(&self, product_id: Uuid, tiers: Vec<NewTier>)
        -> AppResult<Vec<PricingTier>>;

    async fn list_tiers(&self, product_id: Uuid) -> AppResult<Vec<PricingTier>>;
}

/// SeaORM-backed implementation
pub struct PricingStore {
    db: DatabaseConnection,
}

impl PricingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn get_product(&self, product_key: &str) -> AppResult<product_pricing::Model> {
        ProductEntity::find()
            .filter(product_pricing::Column::ProductKey.eq(product_key))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl PricingRepository for PricingStore {
    async fn insert_product(&self, product: NewProduct) -> AppResult<ProductPricing> {
        let now = chrono::Utc::now();
        let active = product_pricing::ActiveModel {
            id: Set(Uuid::new_v4()),
            product_key: Set(product.product_key),
            display_name: Set(product.display_name),
            base_price_cents: Set(product.base_price_cents),
            active: Set(product.active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        Ok(ProductPricing::from(model))
    }

    async fn find_product_by_key(&self, product_key: &str) -> AppResult<Option<ProductPricing>> {
        let model = ProductEntity::find()
            .filter(product_pricing::Column::ProductKey.eq(product_key))
            .one(&self.db)
            .await?;
        Ok(model.map(ProductPricing::from))
    }

    async fn list_products(&self) -> AppResult<Vec<ProductPricing>> {
        let models = ProductEntity::find()
            .order_by_asc(product_pricing::Column::ProductKey)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(ProductPricing::from).collect())
    }

    async fn update_product(
        &self,
        product_key: &str,
        display_name: Option<String>,
        base_price_cents: Option<i64>,
        active: Option<bool>,
    ) -> AppResult<ProductPricing> {
        let model = self.get_product(product_key).await?;

        let mut model_active: product_pricing::ActiveModel = model.into();
        if let Some(display_name) = display_name {
            model_active.display_name = Set(display_name);
        }
        if let Some(base_price_cents) = base_price_cents {
            model_active.base_price_cents = Set(base_price_cents);
        }
        if let Some(active) = active {
            model_active.active = Set(active);
        }
        model_active.updated_at = Set(chrono::Utc::now());

        let model = model_active.update(&self.db).await?;
        Ok(ProductPricing::from(model))
    }

    async fn delete_product(&self, product_key: &str) -> AppResult<()> {
        let model = self.get_product(product_key).await?;
        let result = ProductEntity::delete_by_id(model.id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn replace_tiers(
        &self,
        product_id: Uuid,
        tiers: Vec<NewTier>,
    ) -> AppResult<Vec<PricingTier>> {
        TierEntity::delete_many()
            .filter(pricing_tier::Column::ProductId.eq(product_id))
            .exec(&self.db)
            .await?;

        let now = chrono::Utc::now();
        let mut created = Vec::with_capacity(tiers.len());
        for tier in tiers {
            let active = pricing_tier::ActiveModel {
                id: Set(Uuid::new_v4()),
                product_id: Set(product_id),
                min_quantity: Set(tier.min_quantity),
                unit_price_cents: Set(tier.unit_price_cents),
                created_at: Set(now),
                updated_at: Set(now),
            };
            created.push(PricingTier::from(active.insert(&self.db).await?));
        }

        Ok(created)
    }

    async fn list_tiers(&self, product_id: Uuid) -> AppResult<Vec<PricingTier>> {
        let models = TierEntity::find()
            .filter(pricing_tier::Column::ProductId.eq(product_id))
            .order_by_asc(pricing_tier::Column::MinQuantity)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(PricingTier::from).collect())
    }
}
