//! Voucher code entity and discount arithmetic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Discount kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// Percentage off the subtotal (value is 1..=100)
    Percent,
    /// Fixed amount off in cents
    Fixed,
}

impl From<&str> for DiscountKind {
    fn from(s: &str) -> Self {
        match s {
            "fixed" => DiscountKind::Fixed,
            _ => DiscountKind::Percent,
        }
    }
}

impl std::fmt::Display for DiscountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscountKind::Percent => write!(f, "percent"),
            DiscountKind::Fixed => write!(f, "fixed"),
        }
    }
}

/// A discount code with usage limits and a validity window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voucher {
    pub id: Uuid,
    pub code: String,
    pub kind: DiscountKind,
    /// Percent (1..=100) or cents depending on `kind`
    pub value: i64,
    pub max_uses: i32,
    pub used_count: i32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Voucher {
    /// Whether the voucher can be redeemed at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.active
            && self.used_count < self.max_uses
            && now >= self.valid_from
            && now <= self.valid_until
    }

    /// Discount in cents for the given subtotal, clamped so the total
    /// never goes negative. Percent discounts round down.
    pub fn discount_for(&self, subtotal_cents: i64) -> i64 {
        let raw = match self.kind {
            DiscountKind::Percent => subtotal_cents * self.value / 100,
            DiscountKind::Fixed => self.value,
        };
        raw.clamp(0, subtotal_cents)
    }
}

/// Voucher response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VoucherResponse {
    pub id: Uuid,
    #[schema(example = "WELCOME10")]
    pub code: String,
    #[schema(example = "percent")]
    pub kind: String,
    #[schema(example = 10)]
    pub value: i64,
    pub max_uses: i32,
    pub used_count: i32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Voucher> for VoucherResponse {
    fn from(v: Voucher) -> Self {
        Self {
            id: v.id,
            code: v.code,
            kind: v.kind.to_string(),
            value: v.value,
            max_uses: v.max_uses,
            used_count: v.used_count,
            valid_from: v.valid_from,
            valid_until: v.valid_until,
            active: v.active,
            created_at: v.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn voucher(kind: DiscountKind, value: i64) -> Voucher {
        let now = Utc::now();
        Voucher {
            id: Uuid::new_v4(),
            code: "TEST".to_string(),
            kind,
            value,
            max_uses: 10,
            used_count: 0,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(1),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn percent_discount_rounds_down() {
        let v = voucher(DiscountKind::Percent, 15);
        assert_eq!(v.discount_for(999), 149);
    }

    #[test]
    fn fixed_discount_clamps_to_subtotal() {
        let v = voucher(DiscountKind::Fixed, 5000);
        assert_eq!(v.discount_for(1200), 1200);
        assert_eq!(v.discount_for(8000), 5000);
    }

    #[test]
    fn validity_window_enforced() {
        let now = Utc::now();
        let mut v = voucher(DiscountKind::Percent, 10);
        assert!(v.is_valid_at(now));

        v.valid_from = now + Duration::days(1);
        assert!(!v.is_valid_at(now));

        v.valid_from = now - Duration::days(2);
        v.valid_until = now - Duration::days(1);
        assert!(!v.is_valid_at(now));
    }

    #[test]
    fn exhausted_or_inactive_is_invalid() {
        let now = Utc::now();
        let mut v = voucher(DiscountKind::Percent, 10);
        v.used_count = v.max_uses;
        assert!(!v.is_valid_at(now));

        let mut v = voucher(DiscountKind::Percent, 10);
        v.active = false;
        assert!(!v.is_valid_at(now));
    }
}
