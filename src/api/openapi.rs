//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, job_handler, order_handler, pricing_handler, template_handler, upload_handler,
    user_handler, voucher_handler,
};
use crate::domain::{
    DiscountKind, JobMessageResponse, JobResponse, JobStatus, OrderResponse, PaymentResponse,
    ProductResponse, Quote, TemplateResponse, TierResponse, UploadResponse, UserResponse,
    UserRole, VoucherResponse,
};
use crate::services::TokenResponse;

/// OpenAPI documentation for the Studio Portal API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Studio Portal API",
        version = "0.1.0",
        description = "Design-studio portal: job intake, uploads, messaging, vouchers, pricing, and orders",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT"),
        contact(name = "API Support", email = "support@studio-portal.example")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server"),
        (url = "https://api.studio-portal.example", description = "Production server")
    ),
    paths(
        // Authentication
        auth_handler::register,
        auth_handler::login,
        auth_handler::logout,
        // Users
        user_handler::get_current_user,
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::delete_user,
        user_handler::restore_user,
        // Jobs
        job_handler::create_draft,
        job_handler::submit_draft,
        job_handler::list_jobs,
        job_handler::get_job,
        job_handler::update_status,
        job_handler::assign_designer,
        job_handler::list_messages,
        job_handler::post_message,
        // Uploads
        upload_handler::presign_upload,
        upload_handler::record_upload,
        upload_handler::download_url,
        upload_handler::delete_upload,
        upload_handler::list_for_job,
        // Templates
        template_handler::list_templates,
        template_handler::create_template,
        template_handler::get_template,
        template_handler::update_template,
        template_handler::delete_template,
        template_handler::send_template,
        // Vouchers
        voucher_handler::create_voucher,
        voucher_handler::list_vouchers,
        voucher_handler::get_voucher,
        voucher_handler::update_voucher,
        voucher_handler::delete_voucher,
        voucher_handler::validate_voucher,
        // Pricing
        pricing_handler::create_product,
        pricing_handler::list_products,
        pricing_handler::get_product,
        pricing_handler::update_product,
        pricing_handler::delete_product,
        pricing_handler::set_tiers,
        pricing_handler::quote,
        // Orders
        order_handler::create_order,
        order_handler::list_orders,
        order_handler::get_order,
        order_handler::confirm_payment,
        order_handler::cancel_order,
    ),
    components(
        schemas(
            // Domain types
            UserRole,
            UserResponse,
            DiscountKind,
            JobStatus,
            JobResponse,
            JobMessageResponse,
            UploadResponse,
            TemplateResponse,
            VoucherResponse,
            ProductResponse,
            TierResponse,
            Quote,
            OrderResponse,
            PaymentResponse,
            TokenResponse,
            // Request/response DTOs
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            user_handler::UpdateUserRequest,
            job_handler::SubmitJobRequest,
            job_handler::UpdateStatusRequest,
            job_handler::AssignDesignerRequest,
            job_handler::PostMessageRequest,
            upload_handler::PresignRequest,
            upload_handler::PresignResponse,
            upload_handler::RecordUploadRequest,
            upload_handler::DownloadResponse,
            template_handler::CreateTemplateRequest,
            template_handler::UpdateTemplateRequest,
            template_handler::SendTemplateRequest,
            voucher_handler::CreateVoucherRequest,
            voucher_handler::UpdateVoucherRequest,
            voucher_handler::VoucherValidationResponse,
            pricing_handler::CreateProductRequest,
            pricing_handler::UpdateProductRequest,
            pricing_handler::TierRequest,
            pricing_handler::SetTiersRequest,
            order_handler::CreateOrderRequest,
            order_handler::OrderDetailResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, logout"),
        (name = "Users", description = "Account management"),
        (name = "Jobs", description = "Design job intake and lifecycle"),
        (name = "Uploads", description = "Presigned file uploads"),
        (name = "Templates", description = "Email template management"),
        (name = "Vouchers", description = "Discount codes"),
        (name = "Pricing", description = "Product catalog and quotes"),
        (name = "Orders", description = "Design package orders and payments")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/auth/login"))
                        .build(),
                ),
            );
        }
    }
}
