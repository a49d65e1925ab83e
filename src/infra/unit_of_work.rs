//! Unit of Work pattern implementation.
//!
//! Centralizes repository access and manages the transaction lifecycle
//! for the flows that must be atomic: draft submission (status change +
//! upload claiming) and order creation (voucher redemption + order row).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    AccessMode, ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, IsolationLevel, QueryFilter, Set, TransactionTrait,
};
use std::sync::Arc;
use uuid::Uuid;

use super::repositories::entities::{design_package_order, file_upload, job, voucher_code};
use super::repositories::escape_like;
use super::repositories::{
    JobRepository, JobStore, MessageRepository, MessageStore, OrderRepository, OrderStore,
    PaymentRepository, PaymentStore, PricingRepository, PricingStore, TemplateRepository,
    TemplateStore, UploadRepository, UploadStore, UserRepository, UserStore, VoucherRepository,
    VoucherStore,
};
use crate::domain::{DesignPackageOrder, Job, JobStatus, OrderStatus};
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: the generic `transaction` method makes this trait non-dyn;
/// services are generic over it instead of boxing it.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;
    fn jobs(&self) -> Arc<dyn JobRepository>;
    fn uploads(&self) -> Arc<dyn UploadRepository>;
    fn messages(&self) -> Arc<dyn MessageRepository>;
    fn templates(&self) -> Arc<dyn TemplateRepository>;
    fn vouchers(&self) -> Arc<dyn VoucherRepository>;
    fn pricing(&self) -> Arc<dyn PricingRepository>;
    fn orders(&self) -> Arc<dyn OrderRepository>;
    fn payments(&self) -> Arc<dyn PaymentRepository>;

    /// Execute a closure within a transaction.
    ///
    /// The transaction is committed on success and rolled back on error.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send;
}

/// Repository access within a transaction.
pub struct TransactionContext<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TransactionContext<'a> {
    fn new(txn: &'a DatabaseTransaction) -> Self {
        Self { txn }
    }

    pub fn jobs(&self) -> TxJobRepository<'_> {
        TxJobRepository { txn: self.txn }
    }

    pub fn uploads(&self) -> TxUploadRepository<'_> {
        TxUploadRepository { txn: self.txn }
    }

    pub fn vouchers(&self) -> TxVoucherRepository<'_> {
        TxVoucherRepository { txn: self.txn }
    }

    pub fn orders(&self) -> TxOrderRepository<'_> {
        TxOrderRepository { txn: self.txn }
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    db: DatabaseConnection,
    users: Arc<UserStore>,
    jobs: Arc<JobStore>,
    uploads: Arc<UploadStore>,
    messages: Arc<MessageStore>,
    templates: Arc<TemplateStore>,
    vouchers: Arc<VoucherStore>,
    pricing: Arc<PricingStore>,
    orders: Arc<OrderStore>,
    payments: Arc<PaymentStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            users: Arc::new(UserStore::new(db.clone())),
            jobs: Arc::new(JobStore::new(db.clone())),
            uploads: Arc::new(UploadStore::new(db.clone())),
            messages: Arc::new(MessageStore::new(db.clone())),
            templates: Arc::new(TemplateStore::new(db.clone())),
            vouchers: Arc::new(VoucherStore::new(db.clone())),
            pricing: Arc::new(PricingStore::new(db.clone())),
            orders: Arc::new(OrderStore::new(db.clone())),
            payments: Arc::new(PaymentStore::new(db.clone())),
            db,
        }
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn jobs(&self) -> Arc<dyn JobRepository> {
        self.jobs.clone()
    }

    fn uploads(&self) -> Arc<dyn UploadRepository> {
        self.uploads.clone()
    }

    fn messages(&self) -> Arc<dyn MessageRepository> {
        self.messages.clone()
    }

    fn templates(&self) -> Arc<dyn TemplateRepository> {
        self.templates.clone()
    }

    fn vouchers(&self) -> Arc<dyn VoucherRepository> {
        self.vouchers.clone()
    }

    fn pricing(&self) -> Arc<dyn PricingRepository> {
        self.pricing.clone()
    }

    fn orders(&self) -> Arc<dyn OrderRepository> {
        self.orders.clone()
    }

    fn payments(&self) -> Arc<dyn PaymentRepository> {
        self.payments.clone()
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'a> FnOnce(
                TransactionContext<'a>,
            ) -> std::pin::Pin<
                Box<dyn std::future::Future<Output = AppResult<T>> + Send + 'a>,
            > + Send,
        T: Send,
    {
        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), Some(AccessMode::ReadWrite))
            .await
            .map_err(AppError::from)?;

        let ctx = TransactionContext::new(&txn);

        match f(ctx).await {
            Ok(result) => {
                txn.commit().await.map_err(AppError::from)?;
                Ok(result)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

/// Transaction-aware job repository.
pub struct TxJobRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxJobRepository<'a> {
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        let model = job::Entity::find_by_id(id).one(self.txn).await?;
        Ok(model.map(Job::from))
    }

    /// Finalize a draft: fill in the brief, flip to submitted, and stamp
    /// the submission time.
    pub async fn mark_submitted(
        &self,
        id: Uuid,
        title: String,
        brief: String,
        product_key: Option<String>,
        due_date: Option<DateTime<Utc>>,
    ) -> AppResult<Job> {
        let model = job::Entity::find_by_id(id)
            .one(self.txn)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = Utc::now();
        let mut active: job::ActiveModel = model.into();
        active.title = Set(title);
        active.brief = Set(brief);
        active.product_key = Set(product_key);
        active.due_date = Set(due_date);
        active.status = Set(JobStatus::Submitted.to_string());
        active.submitted_at = Set(Some(now));
        active.updated_at = Set(now);

        let model = active.update(self.txn).await?;
        Ok(Job::from(model))
    }
}

/// Transaction-aware upload repository.
pub struct TxUploadRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxUploadRepository<'a> {
    /// Associate every unclaimed upload whose key matches `prefix` with
    /// the job. Returns the number of claimed rows.
    pub async fn claim_by_key_prefix(&self, job_id: Uuid, prefix: &str) -> AppResult<u64> {
        let result = file_upload::Entity::update_many()
            .col_expr(file_upload::Column::JobId, Expr::value(Some(job_id)))
            .col_expr(file_upload::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(file_upload::Column::JobId.is_null())
            .filter(file_upload::Column::FileKey.like(format!("{}%", escape_like(prefix))))
            .exec(self.txn)
            .await?;

        Ok(result.rows_affected)
    }
}

/// Transaction-aware voucher repository.
pub struct TxVoucherRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxVoucherRepository<'a> {
    /// Consume one use of the voucher.
    ///
    /// The usage-limit check rides in the UPDATE's WHERE clause, so two
    /// concurrent redemptions of the last remaining use cannot both
    /// succeed.
    pub async fn redeem(&self, id: Uuid) -> AppResult<()> {
        let result = voucher_code::Entity::update_many()
            .col_expr(
                voucher_code::Column::UsedCount,
                Expr::col(voucher_code::Column::UsedCount).add(1),
            )
            .col_expr(voucher_code::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(voucher_code::Column::Id.eq(id))
            .filter(
                Expr::col(voucher_code::Column::UsedCount)
                    .lt(Expr::col(voucher_code::Column::MaxUses)),
            )
            .exec(self.txn)
            .await?;

        if result.rows_affected == 0 {
            return Err(AppError::unprocessable("Voucher is exhausted"));
        }
        Ok(())
    }
}

/// New order row, inserted only inside the order-creation transaction.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub client_id: Uuid,
    pub job_id: Option<Uuid>,
    pub product_key: String,
    pub quantity: i32,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub voucher_id: Option<Uuid>,
}

/// Transaction-aware order repository.
pub struct TxOrderRepository<'a> {
    txn: &'a DatabaseTransaction,
}

impl<'a> TxOrderRepository<'a> {
    pub async fn insert(&self, order: NewOrder) -> AppResult<DesignPackageOrder> {
        let now = Utc::now();
        let active = design_package_order::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(order.client_id),
            job_id: Set(order.job_id),
            product_key: Set(order.product_key),
            quantity: Set(order.quantity),
            subtotal_cents: Set(order.subtotal_cents),
            discount_cents: Set(order.discount_cents),
            total_cents: Set(order.total_cents),
            voucher_id: Set(order.voucher_id),
            status: Set(OrderStatus::PendingPayment.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(self.txn).await?;
        Ok(DesignPackageOrder::from(model))
    }
}
