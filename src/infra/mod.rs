//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections, repositories, and the Unit of Work
//! - Redis cache (sessions, rate limiting)
//! - S3-compatible object storage
//! - SMTP mail delivery
//! - Payment provider API client

pub mod cache;
pub mod db;
pub mod mailer;
pub mod payments;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use cache::{Cache, SessionStore};
pub use db::{Database, Migrator};
pub use mailer::{Mailer, OutgoingEmail, SmtpMailer};
pub use payments::{HttpPaymentProvider, PaymentIntent, PaymentProvider};
pub use repositories::{
    JobRepository, JobScope, JobStore, MessageRepository, MessageStore, NewProduct, NewTemplate,
    NewTier, NewUpload, NewVoucher, OrderRepository, OrderScope, OrderStore, PaymentRepository,
    PaymentStore, PricingRepository, PricingStore, TemplateRepository, TemplateStore,
    UploadRepository, UploadStore, UserRepository, UserStore, VoucherRepository, VoucherStore,
};
pub use storage::{ObjectStorage, S3Storage};
pub use unit_of_work::{
    NewOrder, Persistence, TransactionContext, TxJobRepository, TxOrderRepository,
    TxUploadRepository, TxVoucherRepository, UnitOfWork,
};

#[cfg(any(test, feature = "test-utils"))]
pub use cache::MockSessionStore;
#[cfg(any(test, feature = "test-utils"))]
pub use mailer::MockMailer;
#[cfg(any(test, feature = "test-utils"))]
pub use payments::MockPaymentProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockJobRepository, MockMessageRepository, MockOrderRepository, MockPaymentRepository,
    MockPricingRepository, MockTemplateRepository, MockUploadRepository, MockUserRepository,
    MockVoucherRepository,
};
#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockObjectStorage;
