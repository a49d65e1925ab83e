//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. All repository access goes through the Unit
//! of Work; external collaborators (storage, payments, mail queue) are
//! injected as trait objects.

mod auth_service;
pub mod container;
mod job_service;
mod order_service;
mod pricing_service;
mod template_service;
mod upload_service;
mod user_service;
mod voucher_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use auth_service::{AuthService, Authenticator, Claims, TokenResponse};
pub use job_service::{JobManager, JobService, SubmitJob};
pub use order_service::{CreateOrder, OrderManager, OrderService, OrderWithPayment};
pub use pricing_service::{PricingManager, PricingService};
pub use template_service::{TemplateManager, TemplateService};
pub use upload_service::{PresignUpload, PresignedUpload, RecordUpload, UploadManager, UploadService};
pub use user_service::{UserManager, UserService};
pub use voucher_service::{normalize_code, UpdateVoucher, VoucherManager, VoucherService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;

/// A Unit of Work stub wired from per-test repository mocks.
#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::errors::{AppError, AppResult};
    use crate::infra::{
        JobRepository, MessageRepository, MockJobRepository, MockMessageRepository,
        MockOrderRepository, MockPaymentRepository, MockPricingRepository,
        MockTemplateRepository, MockUploadRepository, MockUserRepository,
        MockVoucherRepository, OrderRepository, PaymentRepository, PricingRepository,
        TemplateRepository, TransactionContext, UnitOfWork, UploadRepository, UserRepository,
        VoucherRepository,
    };

    /// Each field defaults to `None`; accessing an unstubbed repository
    /// panics, which points the test at the missing stub.
    #[derive(Default)]
    pub struct StubUnitOfWork {
        pub users: Option<Arc<MockUserRepository>>,
        pub jobs: Option<Arc<MockJobRepository>>,
        pub uploads: Option<Arc<MockUploadRepository>>,
        pub messages: Option<Arc<MockMessageRepository>>,
        pub templates: Option<Arc<MockTemplateRepository>>,
        pub vouchers: Option<Arc<MockVoucherRepository>>,
        pub pricing: Option<Arc<MockPricingRepository>>,
        pub orders: Option<Arc<MockOrderRepository>>,
        pub payments: Option<Arc<MockPaymentRepository>>,
    }

    #[async_trait]
    impl UnitOfWork for StubUnitOfWork {
        fn users(&self) -> Arc<dyn UserRepository> {
            self.users.clone().expect("users repository not stubbed")
        }

        fn jobs(&self) -> Arc<dyn JobRepository> {
            self.jobs.clone().expect("jobs repository not stubbed")
        }

        fn uploads(&self) -> Arc<dyn UploadRepository> {
            self.uploads.clone().expect("uploads repository not stubbed")
        }

        fn messages(&self) -> Arc<dyn MessageRepository> {
            self.messages.clone().expect("messages repository not stubbed")
        }

        fn templates(&self) -> Arc<dyn TemplateRepository> {
            self.templates.clone().expect("templates repository not stubbed")
        }

        fn vouchers(&self) -> Arc<dyn VoucherRepository> {
            self.vouchers.clone().expect("vouchers repository not stubbed")
        }

        fn pricing(&self) -> Arc<dyn PricingRepository> {
            self.pricing.clone().expect("pricing repository not stubbed")
        }

        fn orders(&self) -> Arc<dyn OrderRepository> {
            self.orders.clone().expect("orders repository not stubbed")
        }

        fn payments(&self) -> Arc<dyn PaymentRepository> {
            self.payments.clone().expect("payments repository not stubbed")
        }

        async fn transaction<F, T>(&self, _f: F) -> AppResult<T>
        where
            F: for<'a> FnOnce(
                    TransactionContext<'a>,
                ) -> std::pin::Pin<
                    Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
                > + Send,
            T: Send,
        {
            // Transactions need a live database; cover those flows with
            // integration tests instead.
            Err(AppError::internal("Transactions not supported in test stub"))
        }
    }
}
