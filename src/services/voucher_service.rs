//! Voucher service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{DiscountKind, Voucher};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{NewVoucher, UnitOfWork};
use crate::types::PaginationParams;

/// Partial update; code and discount are immutable after creation.
#[derive(Debug, Clone, Default)]
pub struct UpdateVoucher {
    pub active: Option<bool>,
    pub max_uses: Option<i32>,
    pub valid_until: Option<DateTime<Utc>>,
}

/// Voucher service trait for dependency injection.
#[async_trait]
pub trait VoucherService: Send + Sync {
    async fn create_voucher(&self, input: NewVoucher) -> AppResult<Voucher>;

    async fn get_voucher(&self, id: Uuid) -> AppResult<Voucher>;

    async fn list_vouchers(&self, params: &PaginationParams) -> AppResult<(Vec<Voucher>, u64)>;

    async fn update_voucher(&self, id: Uuid, input: UpdateVoucher) -> AppResult<Voucher>;

    async fn delete_voucher(&self, id: Uuid) -> AppResult<()>;

    /// Public check: returns the voucher when it is currently redeemable.
    async fn validate_code(&self, code: &str) -> AppResult<Voucher>;
}

/// Normalize a code the way it is stored: trimmed and uppercased.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Why a voucher cannot be redeemed right now, as a client-facing error.
pub(crate) fn check_validity(voucher: &Voucher, now: DateTime<Utc>) -> AppResult<()> {
    if !voucher.active {
        return Err(AppError::unprocessable("Voucher is no longer active"));
    }
    if voucher.used_count >= voucher.max_uses {
        return Err(AppError::unprocessable("Voucher has been fully redeemed"));
    }
    if now < voucher.valid_from {
        return Err(AppError::unprocessable("Voucher is not yet valid"));
    }
    if now > voucher.valid_until {
        return Err(AppError::unprocessable("Voucher has expired"));
    }
    Ok(())
}

/// Concrete implementation of VoucherService.
pub struct VoucherManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> VoucherManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> VoucherService for VoucherManager<U> {
    async fn create_voucher(&self, mut input: NewVoucher) -> AppResult<Voucher> {
        input.code = normalize_code(&input.code);

        if input.code.is_empty() {
            return Err(AppError::validation("Voucher code cannot be empty"));
        }
        match input.kind {
            DiscountKind::Percent => {
                if !(1..=100).contains(&input.value) {
                    return Err(AppError::validation(
                        "Percent discount must be between 1 and 100",
                    ));
                }
            }
            DiscountKind::Fixed => {
                if input.value <= 0 {
                    return Err(AppError::validation("Fixed discount must be positive"));
                }
            }
        }
        if input.max_uses <= 0 {
            return Err(AppError::validation("max_uses must be positive"));
        }
        if input.valid_from >= input.valid_until {
            return Err(AppError::validation(
                "valid_from must be before valid_until",
            ));
        }

        if self
            .uow
            .vouchers()
            .find_by_code(&input.code)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Voucher"));
        }

        self.uow.vouchers().insert(input).await
    }

    async fn get_voucher(&self, id: Uuid) -> AppResult<Voucher> {
        self.uow.vouchers().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list_vouchers(&self, params: &PaginationParams) -> AppResult<(Vec<Voucher>, u64)> {
        self.uow.vouchers().list(params).await
    }

    async fn update_voucher(&self, id: Uuid, input: UpdateVoucher) -> AppResult<Voucher> {
        if let Some(max_uses) = input.max_uses {
            if max_uses <= 0 {
                return Err(AppError::validation("max_uses must be positive"));
            }
        }

        self.uow
            .vouchers()
            .update(id, input.active, input.max_uses, input.valid_until)
            .await
    }

    async fn delete_voucher(&self, id: Uuid) -> AppResult<()> {
        self.uow.vouchers().delete(id).await
    }

    async fn validate_code(&self, code: &str) -> AppResult<Voucher> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockVoucherRepository;
    use crate::services::test_support::StubUnitOfWork;
    use chrono::Duration;

    fn voucher(code: &str) -> Voucher {
        let now = Utc::now();
        Voucher {
            id: Uuid::new_v4(),
            code: code.to_string(),
            kind: DiscountKind::Percent,
            value: 10,
            max_uses: 5,
            used_count: 0,
            valid_from: now - Duration::days(1),
            valid_until: now + Duration::days(1),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn new_voucher() -> NewVoucher {
        let now = Utc::now();
        NewVoucher {
            code: "welcome10".to_string(),
            kind: DiscountKind::Percent,
            value: 10,
            max_uses: 5,
            valid_from: now,
            valid_until: now + Duration::days(30),
            active: true,
        }
    }

    fn service_with(vouchers: MockVoucherRepository) -> VoucherManager<StubUnitOfWork> {
        VoucherManager::new(Arc::new(StubUnitOfWork {
            vouchers: Some(Arc::new(vouchers)),
            ..Default::default()
        }))
    }

    #[tokio::test]
    async fn create_normalizes_code() {
        let mut vouchers = MockVoucherRepository::new();
        vouchers.expect_find_by_code().returning(|_| Ok(None));
        vouchers.expect_insert().returning(|input| {
            assert_eq!(input.code, "WELCOME10");
            Ok(voucher(&input.code))
        });

        let created = service_with(vouchers)
            .create_voucher(new_voucher())
            .await
            .unwrap();
        assert_eq!(created.code, "WELCOME10");
    }

    #[tokio::test]
    async fn create_rejects_bad_percent() {
        let mut input = new_voucher();
        input.value = 150;

        let result = service_with(MockVoucherRepository::new())
            .create_voucher(input)
            .await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_inverted_window() {
        let mut input = new_voucher();
        input.valid_until = input.valid_from - Duration::days(1);

        let result = service_with(MockVoucherRepository::new())
            .create_voucher(input)
            .await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }

    #[tokio::test]
    async fn validate_reports_exhaustion() {
        let mut vouchers = MockVoucherRepository::new();
        vouchers.expect_find_by_code().returning(|code| {
            let mut v = voucher(code);
            v.used_count = v.max_uses;
            Ok(Some(v))
        });

        let result = service_with(vouchers).validate_code("WELCOME10").await;
        assert!(matches!(result.unwrap_err(), AppError::Unprocessable(_)));
    }

    #[tokio::test]
    async fn validate_accepts_live_code() {
        let mut vouchers = MockVoucherRepository::new();
        vouchers
            .expect_find_by_code()
            .returning(|code| Ok(Some(voucher(code))));

        let result = service_with(vouchers).validate_code(" welcome10 ").await;
        assert!(result.is_ok());
    }
}
