//! Service container - centralized service construction and access.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::{
    AuthService, Authenticator, JobManager, JobService, OrderManager, OrderService,
    PricingManager, PricingService, TemplateManager, TemplateService, UploadManager,
    UploadService, UserManager, UserService, VoucherManager, VoucherService,
};
use crate::config::Config;
use crate::infra::{ObjectStorage, PaymentProvider, Persistence, SessionStore};
use crate::jobs::EmailQueue;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;
    fn users(&self) -> Arc<dyn UserService>;
    fn jobs(&self) -> Arc<dyn JobService>;
    fn uploads(&self) -> Arc<dyn UploadService>;
    fn templates(&self) -> Arc<dyn TemplateService>;
    fn vouchers(&self) -> Arc<dyn VoucherService>;
    fn pricing(&self) -> Arc<dyn PricingService>;
    fn orders(&self) -> Arc<dyn OrderService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    job_service: Arc<dyn JobService>,
    upload_service: Arc<dyn UploadService>,
    template_service: Arc<dyn TemplateService>,
    voucher_service: Arc<dyn VoucherService>,
    pricing_service: Arc<dyn PricingService>,
    order_service: Arc<dyn OrderService>,
}

impl Services {
    /// Wire every service over one Unit of Work.
    pub fn from_parts(
        db: DatabaseConnection,
        sessions: Arc<dyn SessionStore>,
        storage: Arc<dyn ObjectStorage>,
        provider: Arc<dyn PaymentProvider>,
        email_queue: Arc<dyn EmailQueue>,
        config: Config,
    ) -> Self {
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), sessions, config)),
            user_service: Arc::new(UserManager::new(uow.clone())),
            job_service: Arc::new(JobManager::new(uow.clone())),
            upload_service: Arc::new(UploadManager::new(uow.clone(), storage)),
            template_service: Arc::new(TemplateManager::new(uow.clone(), email_queue.clone())),
            voucher_service: Arc::new(VoucherManager::new(uow.clone())),
            pricing_service: Arc::new(PricingManager::new(uow.clone())),
            order_service: Arc::new(OrderManager::new(uow, provider, email_queue)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn jobs(&self) -> Arc<dyn JobService> {
        self.job_service.clone()
    }

    fn uploads(&self) -> Arc<dyn UploadService> {
        self.upload_service.clone()
    }

    fn templates(&self) -> Arc<dyn TemplateService> {
        self.template_service.clone()
    }

    fn vouchers(&self) -> Arc<dyn VoucherService> {
        self.voucher_service.clone()
    }

    fn pricing(&self) -> Arc<dyn PricingService> {
        self.pricing_service.clone()
    }

    fn orders(&self) -> Arc<dyn OrderService> {
        self.order_service.clone()
    }
}
