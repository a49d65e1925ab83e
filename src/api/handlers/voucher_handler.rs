//! Voucher handlers: admin CRUD plus the public validation check.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{DiscountKind, VoucherResponse};
use crate::errors::AppResult;
use crate::infra::NewVoucher;
use crate::services::UpdateVoucher;
use crate::types::{NoContent, Paginated, PaginationParams};

/// Voucher create request (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVoucherRequest {
    #[validate(length(min = 1, message = "Code is required"))]
    #[schema(example = "WELCOME10")]
    pub code: String,
    pub kind: DiscountKind,
    /// Percent (1-100) or cents, depending on kind
    #[schema(example = 10)]
    pub value: i64,
    #[validate(range(min = 1, message = "max_uses must be positive"))]
    #[schema(example = 100)]
    pub max_uses: i32,
    pub valid_from: DateTime<Utc>,
    pub valid_until: DateTime<Utc>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Voucher update request (admin)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateVoucherRequest {
    pub active: Option<bool>,
    pub max_uses: Option<i32>,
    pub valid_until: Option<DateTime<Utc>>,
}

/// Public validation response
#[derive(Debug, Serialize, ToSchema)]
pub struct VoucherValidationResponse {
    #[schema(example = "WELCOME10")]
    pub code: String,
    #[schema(example = "percent")]
    pub kind: String,
    #[schema(example = 10)]
    pub value: i64,
    pub valid_until: DateTime<Utc>,
}

/// Admin CRUD routes
pub fn voucher_admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vouchers).post(create_voucher))
        .route(
            "/:id",
            get(get_voucher).patch(update_voucher).delete(delete_voucher),
        )
}

/// Public routes (no authentication)
pub fn voucher_public_routes() -> Router<AppState> {
    Router::new().route("/validate/:code", get(validate_voucher))
}

/// Create a voucher (admin)
#[utoipa::path(
    post,
    path = "/api/vouchers",
    tag = "Vouchers",
    request_body = CreateVoucherRequest,
    responses(
        (status = 201, description = "Voucher created", body = VoucherResponse),
        (status = 409, description = "Code already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_voucher(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateVoucherRequest>,
) -> AppResult<(StatusCode, Json<VoucherResponse>)> {
    require_admin(&user)?;

    let voucher = state
        .voucher_service
        .create_voucher(NewVoucher {
            code: payload.code,
            kind: payload.kind,
            value: payload.value,
            max_uses: payload.max_uses,
            valid_from: payload.valid_from,
            valid_until: payload.valid_until,
            active: payload.active,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(VoucherResponse::from(voucher))))
}

/// List vouchers (admin)
#[utoipa::path(
    get,
    path = "/api/vouchers",
    tag = "Vouchers",
    responses((status = 200, description = "Paginated vouchers")),
    security(("bearer_auth" = []))
)]
pub async fn list_vouchers(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<VoucherResponse>>> {
    require_admin(&user)?;

    let (vouchers, total) = state.voucher_service.list_vouchers(&params).await?;
    let vouchers = vouchers.into_iter().map(VoucherResponse::from).collect();

    Ok(Json(Paginated::new(vouchers, &params, total)))
}

/// Fetch a voucher (admin)
#[utoipa::path(
    get,
    path = "/api/vouchers/{id}",
    tag = "Vouchers",
    responses((status = 200, description = "Voucher", body = VoucherResponse)),
    security(("bearer_auth" = []))
)]
pub async fn get_voucher(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<VoucherResponse>> {
    require_admin(&user)?;

    let voucher = state.voucher_service.get_voucher(id).await?;
    Ok(Json(VoucherResponse::from(voucher)))
}

/// Update a voucher (admin)
#[utoipa::path(
    patch,
    path = "/api/vouchers/{id}",
    tag = "Vouchers",
    request_body = UpdateVoucherRequest,
    responses((status = 200, description = "Updated voucher", body = VoucherResponse)),
    security(("bearer_auth" = []))
)]
pub async fn update_voucher(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateVoucherRequest>,
) -> AppResult<Json<VoucherResponse>> {
    require_admin(&user)?;

    let voucher = state
        .voucher_service
        .update_voucher(
            id,
            UpdateVoucher {
                active: payload.active,
                max_uses: payload.max_uses,
                valid_until: payload.valid_until,
            },
        )
        .await?;
    Ok(Json(VoucherResponse::from(voucher)))
}

/// Delete a voucher (admin)
#[utoipa::path(
    delete,
    path = "/api/vouchers/{id}",
    tag = "Vouchers",
    responses((status = 204, description = "Deleted")),
    security(("bearer_auth" = []))
)]
pub async fn delete_voucher(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&user)?;

    state.voucher_service.delete_voucher(id).await?;
    Ok(NoContent)
}

/// Public validity check for a code
#[utoipa::path(
    get,
    path = "/api/vouchers/validate/{code}",
    tag = "Vouchers",
    responses(
        (status = 200, description = "Code is redeemable", body = VoucherValidationResponse),
        (status = 404, description = "Unknown code"),
        (status = 422, description = "Code is not redeemable")
    )
)]
pub async fn validate_voucher(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<VoucherValidationResponse>> {
    let voucher = state.voucher_service.validate_code(&code).await?;

    Ok(Json(VoucherValidationResponse {
        code: voucher.code,
        kind: voucher.kind.to_string(),
        value: voucher.value,
        valid_until: voucher.valid_until,
    }))
}
