//! Order and payment handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{OrderResponse, PaymentResponse};
use crate::errors::AppResult;
use crate::services::CreateOrder;
use crate::types::{Paginated, PaginationParams};

/// Checkout request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Product key is required"))]
    #[schema(example = "brochure")]
    pub product_key: String,
    #[validate(range(min = 1, message = "Quantity must be positive"))]
    #[schema(example = 250)]
    pub quantity: i32,
    #[schema(example = "WELCOME10")]
    pub voucher_code: Option<String>,
    pub job_id: Option<Uuid>,
}

/// Order with its payment handle
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetailResponse {
    pub order: OrderResponse,
    pub payment: Option<PaymentResponse>,
    /// Provider client secret for the browser payment element
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

/// Create order routes
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order))
        .route("/:id/payment/confirm", post(confirm_payment))
        .route("/:id/cancel", post(cancel_order))
}

/// Create an order and its payment intent
#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderDetailResponse),
        (status = 404, description = "Unknown product or voucher"),
        (status = 422, description = "Quote or voucher not applicable")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<OrderDetailResponse>)> {
    let created = state
        .order_service
        .create_order(
            &user.actor(),
            CreateOrder {
                product_key: payload.product_key,
                quantity: payload.quantity,
                voucher_code: payload.voucher_code,
                job_id: payload.job_id,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderDetailResponse {
            order: OrderResponse::from(created.order),
            payment: Some(PaymentResponse::from(created.payment)),
            client_secret: created.client_secret,
        }),
    ))
}

/// Role-scoped order listing
#[utoipa::path(
    get,
    path = "/api/orders",
    tag = "Orders",
    responses((status = 200, description = "Paginated orders")),
    security(("bearer_auth" = []))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<OrderResponse>>> {
    let (orders, total) = state
        .order_service
        .list_orders(&user.actor(), &params)
        .await?;

    let orders = orders.into_iter().map(OrderResponse::from).collect();
    Ok(Json(Paginated::new(orders, &params, total)))
}

/// Fetch an order with its payment
#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Orders",
    responses(
        (status = 200, description = "Order", body = OrderDetailResponse),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetailResponse>> {
    let (order, payment) = state.order_service.get_order(id, &user.actor()).await?;

    Ok(Json(OrderDetailResponse {
        order: OrderResponse::from(order),
        payment: payment.map(PaymentResponse::from),
        client_secret: None,
    }))
}

/// Settle the order from the provider's intent state (idempotent)
#[utoipa::path(
    post,
    path = "/api/orders/{id}/payment/confirm",
    tag = "Orders",
    responses(
        (status = 200, description = "Order and payment state", body = OrderDetailResponse),
        (status = 409, description = "Order is cancelled")
    ),
    security(("bearer_auth" = []))
)]
pub async fn confirm_payment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderDetailResponse>> {
    let (order, payment) = state
        .order_service
        .confirm_payment(id, &user.actor())
        .await?;

    Ok(Json(OrderDetailResponse {
        order: OrderResponse::from(order),
        payment: Some(PaymentResponse::from(payment)),
        client_secret: None,
    }))
}

/// Cancel a pending order
#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    tag = "Orders",
    responses(
        (status = 200, description = "Cancelled order", body = OrderResponse),
        (status = 409, description = "Order is not pending")
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<OrderResponse>> {
    let order = state.order_service.cancel_order(id, &user.actor()).await?;
    Ok(Json(OrderResponse::from(order)))
}
