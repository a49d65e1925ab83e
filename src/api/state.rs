//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Cache, Database, ObjectStorage, PaymentProvider};
use crate::jobs::EmailQueue;
use crate::services::{
    AuthService, JobService, OrderService, PricingService, Services, TemplateService,
    UploadService, UserService, VoucherService,
};

/// Application state containing all services.
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub job_service: Arc<dyn JobService>,
    pub upload_service: Arc<dyn UploadService>,
    pub template_service: Arc<dyn TemplateService>,
    pub voucher_service: Arc<dyn VoucherService>,
    pub pricing_service: Arc<dyn PricingService>,
    pub order_service: Arc<dyn OrderService>,
    /// Redis cache (sessions, rate limiting, health checks)
    pub cache: Arc<Cache>,
    /// Database connection (health checks)
    pub database: Arc<Database>,
}

impl AppState {
    /// Wire the full state from infrastructure handles.
    pub fn from_config(
        database: Arc<Database>,
        cache: Arc<Cache>,
        storage: Arc<dyn ObjectStorage>,
        provider: Arc<dyn PaymentProvider>,
        email_queue: Arc<dyn EmailQueue>,
        config: Config,
    ) -> Self {
        let services = Services::from_parts(
            database.get_connection(),
            cache.clone(),
            storage,
            provider,
            email_queue,
            config,
        );

        use crate::services::ServiceContainer;

        Self {
            auth_service: services.auth(),
            user_service: services.users(),
            job_service: services.jobs(),
            upload_service: services.uploads(),
            template_service: services.templates(),
            voucher_service: services.vouchers(),
            pricing_service: services.pricing(),
            order_service: services.orders(),
            cache,
            database,
        }
    }
}
