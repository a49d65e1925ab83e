//! Product pricing, quantity tiers, and quote computation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

use super::Voucher;

/// A purchasable product with a base price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductPricing {
    pub id: Uuid,
    pub product_key: String,
    pub display_name: String,
    pub base_price_cents: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Quantity price break for a product. The tier with the highest
/// `min_quantity` not exceeding the ordered quantity applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingTier {
    pub id: Uuid,
    pub product_id: Uuid,
    pub min_quantity: i32,
    pub unit_price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A priced quote, before an order is placed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Quote {
    #[schema(example = "brochure")]
    pub product_key: String,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub voucher_code: Option<String>,
}

/// Compute a quote for `quantity` units of `product` using its tiers,
/// optionally discounted by an already-validated voucher.
///
/// # Errors
/// - `Unprocessable` when quantity is not positive or no tier covers it.
pub fn compute_quote(
    product: &ProductPricing,
    tiers: &[PricingTier],
    quantity: i32,
    voucher: Option<&Voucher>,
) -> AppResult<Quote> {
    if quantity <= 0 {
        return Err(AppError::unprocessable("Quantity must be positive"));
    }

    let tier = tiers
        .iter()
        .filter(|t| t.min_quantity <= quantity)
        .max_by_key(|t| t.min_quantity)
        .ok_or_else(|| {
            AppError::unprocessable(format!(
                "No pricing tier covers quantity {} for {}",
                quantity, product.product_key
            ))
        })?;

    let subtotal = product.base_price_cents + tier.unit_price_cents * i64::from(quantity);
    let discount = voucher.map(|v| v.discount_for(subtotal)).unwrap_or(0);

    Ok(Quote {
        product_key: product.product_key.clone(),
        quantity,
        unit_price_cents: tier.unit_price_cents,
        subtotal_cents: subtotal,
        discount_cents: discount,
        total_cents: subtotal - discount,
        voucher_code: voucher.map(|v| v.code.clone()),
    })
}

/// Product response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductResponse {
    pub id: Uuid,
    #[schema(example = "brochure")]
    pub product_key: String,
    #[schema(example = "Tri-fold brochure design")]
    pub display_name: String,
    pub base_price_cents: i64,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tiers: Option<Vec<TierResponse>>,
    pub created_at: DateTime<Utc>,
}

impl ProductResponse {
    pub fn with_tiers(product: ProductPricing, tiers: Vec<PricingTier>) -> Self {
        let mut response = Self::from(product);
        response.tiers = Some(tiers.into_iter().map(TierResponse::from).collect());
        response
    }
}

impl From<ProductPricing> for ProductResponse {
    fn from(p: ProductPricing) -> Self {
        Self {
            id: p.id,
            product_key: p.product_key,
            display_name: p.display_name,
            base_price_cents: p.base_price_cents,
            active: p.active,
            tiers: None,
            created_at: p.created_at,
        }
    }
}

/// Tier response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TierResponse {
    pub id: Uuid,
    pub min_quantity: i32,
    pub unit_price_cents: i64,
}

impl From<PricingTier> for TierResponse {
    fn from(t: PricingTier) -> Self {
        Self {
            id: t.id,
            min_quantity: t.min_quantity,
            unit_price_cents: t.unit_price_cents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DiscountKind;
    use chrono::Duration;

    fn product(base_cents: i64) -> ProductPricing {
        let now = Utc::now();
        ProductPricing {
            id: Uuid::new_v4(),
            product_key: "brochure".to_string(),
            display_name: "Brochure".to_string(),
            base_price_cents: base_cents,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn tier(product_id: Uuid, min_quantity: i32, unit_cents: i64) -> PricingTier {
        let now = Utc::now();
        PricingTier {
            id: Uuid::new_v4(),
            product_id,
            min_quantity,
            unit_price_cents: unit_cents,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn picks_best_matching_tier() {
        let p = product(1000);
        let tiers = vec![tier(p.id, 1, 50), tier(p.id, 100, 30), tier(p.id, 500, 20)];

        let quote = compute_quote(&p, &tiers, 250, None).unwrap();
        assert_eq!(quote.unit_price_cents, 30);
        assert_eq!(quote.subtotal_cents, 1000 + 30 * 250);
        assert_eq!(quote.total_cents, quote.subtotal_cents);
    }

    #[test]
    fn quantity_below_all_tiers_is_unprocessable() {
        let p = product(1000);
        let tiers = vec![tier(p.id, 50, 40)];
        assert!(compute_quote(&p, &tiers, 10, None).is_err());
    }

    #[test]
    fn rejects_non_positive_quantity() {
        let p = product(1000);
        let tiers = vec![tier(p.id, 1, 40)];
        assert!(compute_quote(&p, &tiers, 0, None).is_err());
        assert!(compute_quote(&p, &tiers, -3, None).is_err());
    }

    #[test]
    fn voucher_discount_applied_to_total() {
        let p = product(0);
        let tiers = vec![tier(p.id, 1, 100)];
        let now = Utc::now();
        let voucher = Voucher {
            id: Uuid::new_v4(),
            code: "TEN".to_string(),
            kind: DiscountKind::Percent,
            value: 10,
            max_uses: 5,
            used_count: 0,
            valid_from: now - Duration::hours(1),
            valid_until: now + Duration::hours(1),
            active: true,
            created_at: now,
            updated_at: now,
        };

        let quote = compute_quote(&p, &tiers, 10, Some(&voucher)).unwrap();
        assert_eq!(quote.subtotal_cents, 1000);
        assert_eq!(quote.discount_cents, 100);
        assert_eq!(quote.total_cents, 900);
        assert_eq!(quote.voucher_code.as_deref(), Some("TEN"));
    }
}
