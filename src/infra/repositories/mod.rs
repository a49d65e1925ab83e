//! Repository layer - Data access abstraction
//!
//! One repository trait + SeaORM-backed store per aggregate. All query
//! methods return domain types, never entity models.

pub(crate) mod entities;

mod job_repository;
mod message_repository;
mod order_repository;
mod payment_repository;
mod pricing_repository;
mod template_repository;
mod upload_repository;
mod user_repository;
mod voucher_repository;

pub use job_repository::{JobRepository, JobScope, JobStore};
pub use message_repository::{MessageRepository, MessageStore};
pub use order_repository::{OrderRepository, OrderScope, OrderStore};
pub use payment_repository::{PaymentRepository, PaymentStore};
pub use pricing_repository::{NewProduct, NewTier, PricingRepository, PricingStore};
pub use template_repository::{NewTemplate, TemplateRepository, TemplateStore};
pub use upload_repository::{NewUpload, UploadRepository, UploadStore};
pub use user_repository::{UserRepository, UserStore};
pub use voucher_repository::{NewVoucher, VoucherRepository, VoucherStore};

pub(crate) use upload_repository::escape_like;

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use job_repository::MockJobRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use message_repository::MockMessageRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use order_repository::MockOrderRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use payment_repository::MockPaymentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use pricing_repository::MockPricingRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use template_repository::MockTemplateRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use upload_repository::MockUploadRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use voucher_repository::MockVoucherRepository;
