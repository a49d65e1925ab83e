//! Design package order entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Order lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingPayment,
    Paid,
    Cancelled,
}

impl From<&str> for OrderStatus {
    fn from(s: &str) -> Self {
        match s {
            "paid" => OrderStatus::Paid,
            "cancelled" => OrderStatus::Cancelled,
            _ => OrderStatus::PendingPayment,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::PendingPayment => "pending_payment",
            OrderStatus::Paid => "paid",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// A purchased design package, optionally linked to a job and voucher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignPackageOrder {
    pub id: Uuid,
    pub client_id: Uuid,
    pub job_id: Option<Uuid>,
    pub product_key: String,
    pub quantity: i32,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub voucher_id: Option<Uuid>,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Order response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub job_id: Option<Uuid>,
    #[schema(example = "brochure")]
    pub product_key: String,
    pub quantity: i32,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub voucher_id: Option<Uuid>,
    #[schema(example = "pending_payment")]
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<DesignPackageOrder> for OrderResponse {
    fn from(order: DesignPackageOrder) -> Self {
        Self {
            id: order.id,
            client_id: order.client_id,
            job_id: order.job_id,
            product_key: order.product_key,
            quantity: order.quantity,
            subtotal_cents: order.subtotal_cents,
            discount_cents: order.discount_cents,
            total_cents: order.total_cents,
            voucher_id: order.voucher_id,
            status: order.status.to_string(),
            created_at: order.created_at,
        }
    }
}
