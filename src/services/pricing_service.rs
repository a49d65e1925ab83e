//! Pricing service: product catalog, quantity tiers, and quotes.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;

use super::voucher_service::{check_validity, normalize_code};
use crate::domain::{compute_quote, PricingTier, ProductPricing, Quote, Voucher};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{NewProduct, NewTier, UnitOfWork};

/// Pricing service trait for dependency injection.
#[async_trait]
pub trait PricingService: Send + Sync {
    async fn create_product(&self, input: NewProduct) -> AppResult<ProductPricing>;

    async fn get_product(&self, key: &str) -> AppResult<(ProductPricing, Vec<PricingTier>)>;

    async fn list_products(&self) -> AppResult<Vec<ProductPricing>>;

    async fn update_product(
        &self,
        key: &str,
        display_name: Option<String>,
        base_price_cents: Option<i64>,
        active: Option<bool>,
    ) -> AppResult<ProductPricing>;

    async fn delete_product(&self, key: &str) -> AppResult<()>;

    /// Replace the product's tiers wholesale.
    async fn set_tiers(&self, key: &str, tiers: Vec<NewTier>) -> AppResult<Vec<PricingTier>>;

    /// Public quote; the voucher, when given, must be redeemable now.
    async fn quote(
        &self,
        product_key: &str,
        quantity: i32,
        voucher_code: Option<&str>,
    ) -> AppResult<Quote>;
}

/// Concrete implementation of PricingService.
pub struct PricingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> PricingManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn lookup_voucher(&self, code: &str) -> AppResult<Voucher> {
        let voucher = self
            .uow
            .vouchers()
            .find_by_code(&normalize_code(code))
            .await?
            .ok_or_not_found()?;
        check_validity(&voucher, Utc::now())?;
        Ok(voucher)
    }
}

#[async_trait]
impl<U: UnitOfWork> PricingService for PricingManager<U> {
    async fn create_product(&self, input: NewProduct) -> AppResult<ProductPricing> {
        if input.product_key.trim().is_empty() {
            return Err(AppError::validation("Product key cannot be empty"));
        }
        if input.base_price_cents < 0 {
            return Err(AppError::validation("Base price cannot be negative"));
        }
        if self
            .uow
            .pricing()
            .find_product_by_key(&input.product_key)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Product"));
        }

        self.uow.pricing().insert_product(input).await
    }

    async fn get_product(&self, key: &str) -> AppResult<(ProductPricing, Vec<PricingTier>)> {
        let product = self
            .uow
            .pricing()
            .find_product_by_key(key)
            .await?
            .ok_or_not_found()?;
        let tiers = self.uow.pricing().list_tiers(product.id).await?;
        Ok((product, tiers))
    }

    async fn list_products(&self) -> AppResult<Vec<ProductPricing>> {
        self.uow.pricing().list_products().await
    }

    async fn update_product(
        &self,
        key: &str,
        display_name: Option<String>,
        base_price_cents: Option<i64>,
        active: Option<bool>,
    ) -> AppResult<ProductPricing> {
        if let Some(base) = base_price_cents {
            if base < 0 {
                return Err(AppError::validation("Base price cannot be negative"));
            }
        }

        self.uow
            .pricing()
            .update_product(key, display_name, base_price_cents, active)
            .await
    }

    async fn delete_product(&self, key: &str) -> AppResult<()> {
        self.uow.pricing().delete_product(key).await
    }

    async fn set_tiers(&self, key: &str, tiers: Vec<NewTier>) -> AppResult<Vec<PricingTier>> {
        if tiers.is_empty() {
            return Err(AppError::validation("At least one tier is required"));
        }

        let mut seen = HashSet::new();
        for tier in &tiers {
            if tier.min_quantity < 1 {
                return Err(AppError::validation("Tier min_quantity must be at least 1"));
            }
            if tier.unit_price_cents < 0 {
                return Err(AppError::validation("Tier unit price cannot be negative"));
            }
            if !seen.insert(tier.min_quantity) {
                return Err(AppError::validation(format!(
                    "Duplicate tier at quantity {}",
                    tier.min_quantity
                )));
            }
        }

        let product = self
            .uow
            .pricing()
            .find_product_by_key(key)
            .await?
            .ok_or_not_found()?;

        self.uow.pricing().replace_tiers(product.id, tiers).await
    }

    async fn quote(
        &self,
        product_key: &str,
        quantity: i32,
        voucher_code: Option<&str>,
    ) -> AppResult<Quote> {
        let product = self
            .uow
            .pricing()
            .find_product_by_key(product_key)
            .await?
            .ok_or_not_found()?;

        // Inactive products are invisible to buyers
        if !product.active {
            return Err(AppError::NotFound);
        }

        let tiers = self.uow.pricing().list_tiers(product.id).await?;

        let voucher = match voucher_code {
            Some(code) => Some(self.lookup_voucher(code).await?),
            None => None,
        };

        compute_quote(&product, &tiers, quantity, voucher.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockPricingRepository, MockVoucherRepository};
    use crate::services::test_support::StubUnitOfWork;
    use uuid::Uuid;

    fn product(key: &str, active: bool) -> ProductPricing {
        let now = Utc::now();
        ProductPricing {
            id: Uuid::new_v4(),
            product_key: key.to_string(),
            display_name: "Brochure".to_string(),
            base_price_cents: 1000,
            active,
            created_at: now,
            updated_at: now,
        }
    }

    fn tier(min_quantity: i32, unit_price_cents: i64) -> PricingTier {
        let now = Utc::now();
        PricingTier {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            min_quantity,
            unit_price_cents,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn quote_hides_inactive_product() {
        let mut pricing = MockPricingRepository::new();
        pricing
            .expect_find_product_by_key()
            .returning(|key| Ok(Some(product(key, false))));

        let service = PricingManager::new(Arc::new(StubUnitOfWork {
            pricing: Some(Arc::new(pricing)),
            ..Default::default()
        }));

        let result = service.quote("brochure", 100, None).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn quote_computes_totals() {
        let mut pricing = MockPricingRepository::new();
        pricing
            .expect_find_product_by_key()
            .returning(|key| Ok(Some(product(key, true))));
        pricing
            .expect_list_tiers()
            .returning(|_| Ok(vec![tier(1, 50), tier(100, 30)]));

        let service = PricingManager::new(Arc::new(StubUnitOfWork {
            pricing: Some(Arc::new(pricing)),
            ..Default::default()
        }));

        let quote = service.quote("brochure", 200, None).await.unwrap();
        assert_eq!(quote.unit_price_cents, 30);
        assert_eq!(quote.subtotal_cents, 1000 + 30 * 200);
        assert_eq!(quote.discount_cents, 0);
    }

    #[tokio::test]
    async fn quote_rejects_invalid_voucher() {
        let mut pricing = MockPricingRepository::new();
        pricing
            .expect_find_product_by_key()
            .returning(|key| Ok(Some(product(key, true))));
        pricing.expect_list_tiers().returning(|_| Ok(vec![tier(1, 50)]));

        let mut vouchers = MockVoucherRepository::new();
        vouchers.expect_find_by_code().returning(|_| Ok(None));

        let service = PricingManager::new(Arc::new(StubUnitOfWork {
            pricing: Some(Arc::new(pricing)),
            vouchers: Some(Arc::new(vouchers)),
            ..Default::default()
        }));

        let result = service.quote("brochure", 10, Some("NOPE")).await;
        assert!(matches!(result.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn set_tiers_rejects_duplicates() {
        let service = PricingManager::new(Arc::new(StubUnitOfWork::default()));

        let result = service
            .set_tiers(
                "brochure",
                vec![
                    NewTier {
                        min_quantity: 10,
                        unit_price_cents: 50,
                    },
                    NewTier {
                        min_quantity: 10,
                        unit_price_cents: 40,
                    },
                ],
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }
}
