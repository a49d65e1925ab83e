//! Pricing handlers: admin catalog management and the public quote.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{ProductResponse, Quote, TierResponse};
use crate::errors::AppResult;
use crate::infra::{NewProduct, NewTier};
use crate::types::NoContent;

/// Product create request (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, message = "Product key is required"))]
    #[schema(example = "brochure")]
    pub product_key: String,
    #[validate(length(min = 1, message = "Display name is required"))]
    #[schema(example = "Tri-fold brochure design")]
    pub display_name: String,
    #[validate(range(min = 0, message = "Base price cannot be negative"))]
    #[schema(example = 1000)]
    pub base_price_cents: i64,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Product update request (admin)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub display_name: Option<String>,
    pub base_price_cents: Option<i64>,
    pub active: Option<bool>,
}

/// Tier definition used when replacing a product's tier set
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TierRequest {
    #[validate(range(min = 1, message = "min_quantity must be at least 1"))]
    #[schema(example = 100)]
    pub min_quantity: i32,
    #[validate(range(min = 0, message = "Unit price cannot be negative"))]
    #[schema(example = 30)]
    pub unit_price_cents: i64,
}

/// Replace-tiers request (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetTiersRequest {
    #[validate(nested)]
    pub tiers: Vec<TierRequest>,
}

/// Quote query parameters
#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    pub product: String,
    pub quantity: i32,
    pub voucher: Option<String>,
}

/// Admin catalog routes
pub fn pricing_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:key",
            get(get_product).patch(update_product).delete(delete_product),
        )
        .route("/products/:key/tiers", put(set_tiers))
}

/// Public routes (no authentication)
pub fn pricing_public_routes() -> Router<AppState> {
    Router::new().route("/quote", get(quote))
}

/// Create a product (admin)
#[utoipa::path(
    post,
    path = "/api/pricing/products",
    tag = "Pricing",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 409, description = "Key already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ProductResponse>)> {
    require_admin(&user)?;

    let product = state
        .pricing_service
        .create_product(NewProduct {
            product_key: payload.product_key,
            display_name: payload.display_name,
            base_price_cents: payload.base_price_cents,
            active: payload.active,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

/// List products (admin)
#[utoipa::path(
    get,
    path = "/api/pricing/products",
    tag = "Pricing",
    responses((status = 200, description = "Products", body = [ProductResponse])),
    security(("bearer_auth" = []))
)]
pub async fn list_products(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<ProductResponse>>> {
    require_admin(&user)?;

    let products = state.pricing_service.list_products().await?;
    Ok(Json(
        products.into_iter().map(ProductResponse::from).collect(),
    ))
}

/// Fetch a product with its tiers (admin)
#[utoipa::path(
    get,
    path = "/api/pricing/products/{key}",
    tag = "Pricing",
    responses((status = 200, description = "Product with tiers", body = ProductResponse)),
    security(("bearer_auth" = []))
)]
pub async fn get_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(key): Path<String>,
) -> AppResult<Json<ProductResponse>> {
    require_admin(&user)?;

    let (product, tiers) = state.pricing_service.get_product(&key).await?;
    Ok(Json(ProductResponse::with_tiers(product, tiers)))
}

/// Update a product (admin)
#[utoipa::path(
    patch,
    path = "/api/pricing/products/{key}",
    tag = "Pricing",
    request_body = UpdateProductRequest,
    responses((status = 200, description = "Updated product", body = ProductResponse)),
    security(("bearer_auth" = []))
)]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<ProductResponse>> {
    require_admin(&user)?;

    let product = state
        .pricing_service
        .update_product(
            &key,
            payload.display_name,
            payload.base_price_cents,
            payload.active,
        )
        .await?;
    Ok(Json(ProductResponse::from(product)))
}

/// Delete a product and its tiers (admin)
#[utoipa::path(
    delete,
    path = "/api/pricing/products/{key}",
    tag = "Pricing",
    responses((status = 204, description = "Deleted")),
    security(("bearer_auth" = []))
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(key): Path<String>,
) -> AppResult<NoContent> {
    require_admin(&user)?;

    state.pricing_service.delete_product(&key).await?;
    Ok(NoContent)
}

/// Replace a product's tier set (admin)
#[utoipa::path(
    put,
    path = "/api/pricing/products/{key}/tiers",
    tag = "Pricing",
    request_body = SetTiersRequest,
    responses((status = 200, description = "New tier set", body = [TierResponse])),
    security(("bearer_auth" = []))
)]
pub async fn set_tiers(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(key): Path<String>,
    ValidatedJson(payload): ValidatedJson<SetTiersRequest>,
) -> AppResult<Json<Vec<TierResponse>>> {
    require_admin(&user)?;

    let tiers = payload
        .tiers
        .into_iter()
        .map(|t| NewTier {
            min_quantity: t.min_quantity,
            unit_price_cents: t.unit_price_cents,
        })
        .collect();

    let tiers = state.pricing_service.set_tiers(&key, tiers).await?;
    Ok(Json(tiers.into_iter().map(TierResponse::from).collect()))
}

/// Public quote for a product and quantity
#[utoipa::path(
    get,
    path = "/api/pricing/quote",
    tag = "Pricing",
    responses(
        (status = 200, description = "Quote", body = Quote),
        (status = 404, description = "Unknown or inactive product"),
        (status = 422, description = "No tier covers the quantity")
    )
)]
pub async fn quote(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> AppResult<Json<Quote>> {
    let quote = state
        .pricing_service
        .quote(&query.product, query.quantity, query.voucher.as_deref())
        .await?;

    Ok(Json(quote))
}
