//! Order service: checkout, payment confirmation, cancellation.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::voucher_service::{check_validity, normalize_code};
use crate::config::{DEFAULT_CURRENCY, TEMPLATE_ORDER_CONFIRMATION};
use crate::domain::{
    compute_quote, Actor, DesignPackageOrder, OrderStatus, Payment, PaymentStatus, UserRole,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{NewOrder, OrderScope, PaymentProvider, UnitOfWork};
use crate::jobs::{EmailJob, EmailQueue};
use crate::types::PaginationParams;

/// Checkout request.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub product_key: String,
    pub quantity: i32,
    pub voucher_code: Option<String>,
    pub job_id: Option<Uuid>,
}

/// A freshly created order with its payment intent handle.
#[derive(Debug, Clone)]
pub struct OrderWithPayment {
    pub order: DesignPackageOrder,
    pub payment: Payment,
    /// Provider client secret for the browser payment element
    pub client_secret: Option<String>,
}

/// Order service trait for dependency injection.
#[async_trait]
pub trait OrderService: Send + Sync {
    async fn create_order(&self, actor: &Actor, input: CreateOrder) -> AppResult<OrderWithPayment>;

    async fn get_order(
        &self,
        id: Uuid,
        actor: &Actor,
    ) -> AppResult<(DesignPackageOrder, Option<Payment>)>;

    async fn list_orders(
        &self,
        actor: &Actor,
        params: &PaginationParams,
    ) -> AppResult<(Vec<DesignPackageOrder>, u64)>;

    /// Re-fetch the intent from the provider and settle the order.
    /// Idempotent: confirming a paid order returns it unchanged.
    async fn confirm_payment(
        &self,
        order_id: Uuid,
        actor: &Actor,
    ) -> AppResult<(DesignPackageOrder, Payment)>;

    /// Only while payment is pending.
    async fn cancel_order(&self, order_id: Uuid, actor: &Actor) -> AppResult<DesignPackageOrder>;
}

fn map_intent_status(status: &str) -> PaymentStatus {
    match status {
        "succeeded" => PaymentStatus::Succeeded,
        "processing" => PaymentStatus::Processing,
        "canceled" => PaymentStatus::Failed,
        _ => PaymentStatus::RequiresPayment,
    }
}

fn format_cents(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

/// Concrete implementation of OrderService.
pub struct OrderManager<U: UnitOfWork> {
    uow: Arc<U>,
    provider: Arc<dyn PaymentProvider>,
    email_queue: Arc<dyn EmailQueue>,
}

impl<U: UnitOfWork> OrderManager<U> {
    pub fn new(
        uow: Arc<U>,
        provider: Arc<dyn PaymentProvider>,
        email_queue: Arc<dyn EmailQueue>,
    ) -> Self {
        Self {
            uow,
            provider,
            email_queue,
        }
    }

    async fn get_accessible_order(
        &self,
        id: Uuid,
        actor: &Actor,
    ) -> AppResult<DesignPackageOrder> {
        let order = self.uow.orders().find_by_id(id).await?.ok_or_not_found()?;
        if order.client_id != actor.id && !actor.is_admin() {
            return Err(AppError::Forbidden);
        }
        Ok(order)
    }

    /// Confirmation email, best effort: a mail failure never blocks the
    /// payment settling.
    async fn send_confirmation(&self, order: &DesignPackageOrder) {
        let result = self.try_send_confirmation(order).await;
        if let Err(e) = result {
            tracing::warn!(order_id = %order.id, error = %e, "Confirmation email not sent");
        }
    }

    async fn try_send_confirmation(&self, order: &DesignPackageOrder) -> AppResult<()> {
        let client = self
            .uow
            .users()
            .find_by_id(order.client_id)
            .await?
            .ok_or_not_found()?;

        let job = match self
            .uow
            .templates()
            .find_by_key(TEMPLATE_ORDER_CONFIRMATION)
            .await?
        {
            Some(template) => {
                let vars = HashMap::from([
                    ("name".to_string(), client.name.clone()),
                    ("order_id".to_string(), order.id.to_string()),
                    ("total".to_string(), format_cents(order.total_cents)),
                ]);
                let rendered = template.render(&vars)?;
                EmailJob::new(
                    client.email,
                    rendered.subject,
                    rendered.body_html,
                    rendered.body_text,
                )
            }
            None => EmailJob::new(
                client.email,
                "Your order is confirmed",
                String::new(),
                format!(
                    "Hi {},\n\nYour order {} for {} is confirmed.\n",
                    client.name,
                    order.id,
                    format_cents(order.total_cents)
                ),
            ),
        };

        self.email_queue.enqueue(job).await
    }
}

#[async_trait]
impl<U: UnitOfWork> OrderService for OrderManager<U> {
    async fn create_order(&self, actor: &Actor, input: CreateOrder) -> AppResult<OrderWithPayment> {
        let product = self
            .uow
            .pricing()
            .find_product_by_key(&input.product_key)
            .await?
            .ok_or_not_found()?;
        if !product.active {
            return Err(AppError::NotFound);
        }
        let tiers = self.uow.pricing().list_tiers(product.id).await?;

        let voucher = match &input.voucher_code {
            Some(code) => {
                let voucher = self
                    .uow
                    .vouchers()
                    .find_by_code(&normalize_code(code))
                    .await?
                    .ok_or_not_found()?;
                check_validity(&voucher, Utc::now())?;
                Some(voucher)
            }
            None => None,
        };

        if let Some(job_id) = input.job_id {
            let job = self.uow.jobs().find_by_id(job_id).await?.ok_or_not_found()?;
            if !job.is_participant(actor) {
                return Err(AppError::Forbidden);
            }
        }

        let quote = compute_quote(&product, &tiers, input.quantity, voucher.as_ref())?;
        let voucher_id = voucher.map(|v| v.id);

        let new_order = NewOrder {
            client_id: actor.id,
            job_id: input.job_id,
            product_key: quote.product_key.clone(),
            quantity: quote.quantity,
            subtotal_cents: quote.subtotal_cents,
            discount_cents: quote.discount_cents,
            total_cents: quote.total_cents,
            voucher_id,
        };

        // Redemption and the order row commit together, so an exhausted
        // voucher rolls the whole checkout back.
        let order = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    if let Some(voucher_id) = voucher_id {
                        ctx.vouchers().redeem(voucher_id).await?;
                    }
                    ctx.orders().insert(new_order).await
                })
            })
            .await?;

        let intent = match self
            .provider
            .create_intent(order.total_cents, DEFAULT_CURRENCY, &order.id.to_string())
            .await
        {
            Ok(intent) => intent,
            Err(e) => {
                // The order is unpayable without an intent; close it out.
                if let Err(cancel_err) = self
                    .uow
                    .orders()
                    .set_status(order.id, OrderStatus::Cancelled)
                    .await
                {
                    tracing::error!(order_id = %order.id, error = %cancel_err,
                        "Failed to cancel order after intent failure");
                }
                return Err(e);
            }
        };

        let payment = self
            .uow
            .payments()
            .insert(
                order.id,
                intent.id.clone(),
                order.total_cents,
                DEFAULT_CURRENCY.to_string(),
                map_intent_status(&intent.status),
            )
            .await?;

        Ok(OrderWithPayment {
            order,
            payment,
            client_secret: intent.client_secret,
        })
    }

    async fn get_order(
        &self,
        id: Uuid,
        actor: &Actor,
    ) -> AppResult<(DesignPackageOrder, Option<Payment>)> {
        let order = self.get_accessible_order(id, actor).await?;
        let payment = self.uow.payments().find_for_order(order.id).await?;
        Ok((order, payment))
    }

    async fn list_orders(
        &self,
        actor: &Actor,
        params: &PaginationParams,
    ) -> AppResult<(Vec<DesignPackageOrder>, u64)> {
        let scope = match actor.role {
            UserRole::Admin => OrderScope::All,
            UserRole::Client => OrderScope::Client(actor.id),
            UserRole::Designer => return Err(AppError::Forbidden),
        };

        self.uow.orders().list(scope, params).await
    }

    async fn confirm_payment(
        &self,
        order_id: Uuid,
        actor: &Actor,
    ) -> AppResult<(DesignPackageOrder, Payment)> {
        let order = self.get_accessible_order(order_id, actor).await?;
        let payment = self
            .uow
            .payments()
            .find_for_order(order.id)
            .await?
            .ok_or_not_found()?;

        match order.status {
            OrderStatus::Paid => return Ok((order, payment)),
            OrderStatus::Cancelled => {
                return Err(AppError::invalid_state("Order has been cancelled"))
            }
            OrderStatus::PendingPayment => {}
        }

        let intent = self
            .provider
            .fetch_intent(&payment.provider_intent_id)
            .await?;

        match map_intent_status(&intent.status) {
            PaymentStatus::Succeeded => {
                let payment = self
                    .uow
                    .payments()
                    .set_status(payment.id, PaymentStatus::Succeeded)
                    .await?;
                let order = self
                    .uow
                    .orders()
                    .set_status(order.id, OrderStatus::Paid)
                    .await?;

                self.send_confirmation(&order).await;
                Ok((order, payment))
            }
            PaymentStatus::Processing => {
                let payment = self
                    .uow
                    .payments()
                    .set_status(payment.id, PaymentStatus::Processing)
                    .await?;
                Ok((order, payment))
            }
            PaymentStatus::Failed => {
                let payment = self
                    .uow
                    .payments()
                    .set_status(payment.id, PaymentStatus::Failed)
                    .await?;
                Ok((order, payment))
            }
            PaymentStatus::RequiresPayment => Ok((order, payment)),
        }
    }

    async fn cancel_order(&self, order_id: Uuid, actor: &Actor) -> AppResult<DesignPackageOrder> {
        let order = self.get_accessible_order(order_id, actor).await?;

        if order.status != OrderStatus::PendingPayment {
            return Err(AppError::invalid_state(format!(
                "Cannot cancel an order in state {}",
                order.status
            )));
        }

        self.uow
            .orders()
            .set_status(order.id, OrderStatus::Cancelled)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockOrderRepository, MockPaymentProvider, MockPaymentRepository};
    use crate::jobs::MockEmailQueue;
    use crate::services::test_support::StubUnitOfWork;

    fn order(client_id: Uuid, status: OrderStatus) -> DesignPackageOrder {
        let now = Utc::now();
        DesignPackageOrder {
            id: Uuid::new_v4(),
            client_id,
            job_id: None,
            product_key: "brochure".to_string(),
            quantity: 100,
            subtotal_cents: 4000,
            discount_cents: 400,
            total_cents: 3600,
            voucher_id: None,
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn payment(order_id: Uuid, status: PaymentStatus) -> Payment {
        let now = Utc::now();
        Payment {
            id: Uuid::new_v4(),
            order_id,
            provider_intent_id: "pi_123".to_string(),
            amount_cents: 3600,
            currency: "usd".to_string(),
            status,
            created_at: now,
            updated_at: now,
        }
    }

    fn client_actor() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: UserRole::Client,
        }
    }

    #[tokio::test]
    async fn confirm_is_idempotent_for_paid_orders() {
        let actor = client_actor();
        let client_id = actor.id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order(client_id, OrderStatus::Paid))));

        let mut payments = MockPaymentRepository::new();
        payments
            .expect_find_for_order()
            .returning(|order_id| Ok(Some(payment(order_id, PaymentStatus::Succeeded))));

        // The provider must not be contacted for an already-paid order
        let mut provider = MockPaymentProvider::new();
        provider.expect_fetch_intent().times(0);

        let service = OrderManager::new(
            Arc::new(StubUnitOfWork {
                orders: Some(Arc::new(orders)),
                payments: Some(Arc::new(payments)),
                ..Default::default()
            }),
            Arc::new(provider),
            Arc::new(MockEmailQueue::new()),
        );

        let (order, payment) = service.confirm_payment(Uuid::new_v4(), &actor).await.unwrap();
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(payment.status, PaymentStatus::Succeeded);
    }

    #[tokio::test]
    async fn confirm_rejects_cancelled_order() {
        let actor = client_actor();
        let client_id = actor.id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order(client_id, OrderStatus::Cancelled))));

        let mut payments = MockPaymentRepository::new();
        payments
            .expect_find_for_order()
            .returning(|order_id| Ok(Some(payment(order_id, PaymentStatus::RequiresPayment))));

        let service = OrderManager::new(
            Arc::new(StubUnitOfWork {
                orders: Some(Arc::new(orders)),
                payments: Some(Arc::new(payments)),
                ..Default::default()
            }),
            Arc::new(MockPaymentProvider::new()),
            Arc::new(MockEmailQueue::new()),
        );

        let result = service.confirm_payment(Uuid::new_v4(), &actor).await;
        assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn cancel_only_while_pending() {
        let actor = client_actor();
        let client_id = actor.id;

        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(move |_| Ok(Some(order(client_id, OrderStatus::Paid))));

        let service = OrderManager::new(
            Arc::new(StubUnitOfWork {
                orders: Some(Arc::new(orders)),
                ..Default::default()
            }),
            Arc::new(MockPaymentProvider::new()),
            Arc::new(MockEmailQueue::new()),
        );

        let result = service.cancel_order(Uuid::new_v4(), &actor).await;
        assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn foreign_order_is_forbidden() {
        let mut orders = MockOrderRepository::new();
        orders
            .expect_find_by_id()
            .returning(|_| Ok(Some(order(Uuid::new_v4(), OrderStatus::PendingPayment))));

        let service = OrderManager::new(
            Arc::new(StubUnitOfWork {
                orders: Some(Arc::new(orders)),
                ..Default::default()
            }),
            Arc::new(MockPaymentProvider::new()),
            Arc::new(MockEmailQueue::new()),
        );

        let result = service.get_order(Uuid::new_v4(), &client_actor()).await;
        assert!(matches!(result.unwrap_err(), AppError::Forbidden));
    }

    #[test]
    fn intent_status_mapping() {
        assert_eq!(map_intent_status("succeeded"), PaymentStatus::Succeeded);
        assert_eq!(map_intent_status("processing"), PaymentStatus::Processing);
        assert_eq!(map_intent_status("canceled"), PaymentStatus::Failed);
        assert_eq!(
            map_intent_status("requires_payment_method"),
            PaymentStatus::RequiresPayment
        );
    }

    #[test]
    fn cents_formatting() {
        assert_eq!(format_cents(3600), "$36.00");
        assert_eq!(format_cents(105), "$1.05");
    }
}
