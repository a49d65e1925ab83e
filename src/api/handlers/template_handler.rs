//! Email template handlers (admin only).

use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::TemplateResponse;
use crate::errors::AppResult;
use crate::infra::NewTemplate;
use crate::types::{MessageResponse, NoContent};

/// Template create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTemplateRequest {
    #[validate(length(min = 1, message = "Template key is required"))]
    #[schema(example = "order-confirmation")]
    pub template_key: String,
    #[validate(length(min = 1, message = "Subject is required"))]
    #[schema(example = "Your order {{order_id}} is confirmed")]
    pub subject: String,
    #[serde(default)]
    pub body_html: String,
    #[validate(length(min = 1, message = "Text body is required"))]
    pub body_text: String,
}

/// Template update request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTemplateRequest {
    pub subject: Option<String>,
    pub body_html: Option<String>,
    pub body_text: Option<String>,
}

/// Template send request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SendTemplateRequest {
    #[validate(email(message = "Invalid recipient address"))]
    #[schema(example = "client@example.com")]
    pub to: String,
    /// Values for the template's placeholders
    #[serde(default)]
    pub vars: HashMap<String, String>,
}

/// Create template routes
pub fn template_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route(
            "/:key",
            get(get_template)
                .patch(update_template)
                .delete(delete_template),
        )
        .route("/:key/send", post(send_template))
}

/// List templates (admin)
#[utoipa::path(
    get,
    path = "/api/templates",
    tag = "Templates",
    responses((status = 200, description = "Templates", body = [TemplateResponse])),
    security(("bearer_auth" = []))
)]
pub async fn list_templates(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<TemplateResponse>>> {
    require_admin(&user)?;

    let templates = state.template_service.list_templates().await?;
    Ok(Json(
        templates.into_iter().map(TemplateResponse::from).collect(),
    ))
}

/// Create a template (admin)
#[utoipa::path(
    post,
    path = "/api/templates",
    tag = "Templates",
    request_body = CreateTemplateRequest,
    responses(
        (status = 201, description = "Template created", body = TemplateResponse),
        (status = 409, description = "Key already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_template(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<CreateTemplateRequest>,
) -> AppResult<(StatusCode, Json<TemplateResponse>)> {
    require_admin(&user)?;

    let template = state
        .template_service
        .create_template(NewTemplate {
            template_key: payload.template_key,
            subject: payload.subject,
            body_html: payload.body_html,
            body_text: payload.body_text,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(TemplateResponse::from(template))))
}

/// Fetch a template (admin)
#[utoipa::path(
    get,
    path = "/api/templates/{key}",
    tag = "Templates",
    responses((status = 200, description = "Template", body = TemplateResponse)),
    security(("bearer_auth" = []))
)]
pub async fn get_template(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(key): Path<String>,
) -> AppResult<Json<TemplateResponse>> {
    require_admin(&user)?;

    let template = state.template_service.get_template(&key).await?;
    Ok(Json(TemplateResponse::from(template)))
}

/// Update a template (admin)
#[utoipa::path(
    patch,
    path = "/api/templates/{key}",
    tag = "Templates",
    request_body = UpdateTemplateRequest,
    responses((status = 200, description = "Updated template", body = TemplateResponse)),
    security(("bearer_auth" = []))
)]
pub async fn update_template(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(key): Path<String>,
    Json(payload): Json<UpdateTemplateRequest>,
) -> AppResult<Json<TemplateResponse>> {
    require_admin(&user)?;

    let template = state
        .template_service
        .update_template(&key, payload.subject, payload.body_html, payload.body_text)
        .await?;
    Ok(Json(TemplateResponse::from(template)))
}

/// Delete a template (admin)
#[utoipa::path(
    delete,
    path = "/api/templates/{key}",
    tag = "Templates",
    responses((status = 204, description = "Deleted")),
    security(("bearer_auth" = []))
)]
pub async fn delete_template(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(key): Path<String>,
) -> AppResult<NoContent> {
    require_admin(&user)?;

    state.template_service.delete_template(&key).await?;
    Ok(NoContent)
}

/// Render and enqueue a template for delivery (admin)
#[utoipa::path(
    post,
    path = "/api/templates/{key}/send",
    tag = "Templates",
    request_body = SendTemplateRequest,
    responses(
        (status = 202, description = "Queued"),
        (status = 422, description = "Unresolved placeholder")
    ),
    security(("bearer_auth" = []))
)]
pub async fn send_template(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(key): Path<String>,
    ValidatedJson(payload): ValidatedJson<SendTemplateRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    require_admin(&user)?;

    state
        .template_service
        .send_template(&key, payload.to, payload.vars)
        .await?;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new("Email queued")),
    ))
}
