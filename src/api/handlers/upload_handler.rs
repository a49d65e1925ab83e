//! File upload handlers.
//!
//! Bytes never pass through these endpoints; clients PUT and GET
//! directly against presigned storage URLs.

use axum::{
    extract::{Path, State},
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
use crate::domain::UploadResponse;
use crate::errors::AppResult;
use crate::services::{PresignUpload, RecordUpload};
use crate::types::NoContent;

/// Presign request: target a job or a draft token
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PresignRequest {
    pub job_id: Option<Uuid>,
    #[schema(example = "3f2a9c0d4b6e4f92a1c8d5e7b0a34f61")]
    pub draft_token: Option<String>,
    #[validate(length(min = 1, message = "File name is required"))]
    #[schema(example = "logo.png")]
    pub file_name: String,
    #[validate(length(min = 1, message = "Content type is required"))]
    #[schema(example = "image/png")]
    pub content_type: String,
}

/// Presign response
#[derive(Debug, Serialize, ToSchema)]
pub struct PresignResponse {
    #[schema(example = "drafts/3f2a9c/logo.png")]
    pub file_key: String,
    pub upload_url: String,
}

/// Record request, sent after the client PUT the bytes
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RecordUploadRequest {
    #[validate(length(min = 1, message = "File key is required"))]
    pub file_key: String,
    #[validate(length(min = 1, message = "File name is required"))]
    pub file_name: String,
    #[validate(length(min = 1, message = "Content type is required"))]
    pub content_type: String,
    #[validate(range(min = 1, message = "Size must be positive"))]
    pub size_bytes: i64,
}

/// Download URL response
#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadResponse {
    pub download_url: String,
}

/// Create upload routes
pub fn upload_routes() -> Router<AppState> {
    Router::new()
        .route("/presign", post(presign_upload))
        .route("/", post(record_upload))
        .route("/:id/download", get(download_url))
        .route("/:id", axum::routing::delete(delete_upload))
        .route("/jobs/:job_id", get(list_for_job))
}

/// Mint a presigned upload URL
#[utoipa::path(
    post,
    path = "/api/uploads/presign",
    tag = "Uploads",
    request_body = PresignRequest,
    responses((status = 200, description = "Presigned URL", body = PresignResponse)),
    security(("bearer_auth" = []))
)]
pub async fn presign_upload(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<PresignRequest>,
) -> AppResult<Json<PresignResponse>> {
    let presigned = state
        .upload_service
        .presign_upload(
            &user.actor(),
            PresignUpload {
                job_id: payload.job_id,
                draft_token: payload.draft_token,
                file_name: payload.file_name,
                content_type: payload.content_type,
            },
        )
        .await?;

    Ok(Json(PresignResponse {
        file_key: presigned.file_key,
        upload_url: presigned.upload_url,
    }))
}

/// Record an uploaded file
#[utoipa::path(
    post,
    path = "/api/uploads",
    tag = "Uploads",
    request_body = RecordUploadRequest,
    responses(
        (status = 201, description = "Upload recorded", body = UploadResponse),
        (status = 409, description = "Key already recorded")
    ),
    security(("bearer_auth" = []))
)]
pub async fn record_upload(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<RecordUploadRequest>,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let upload = state
        .upload_service
        .record_upload(
            &user.actor(),
            RecordUpload {
                file_key: payload.file_key,
                file_name: payload.file_name,
                content_type: payload.content_type,
                size_bytes: payload.size_bytes,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(UploadResponse::from(upload))))
}

/// Mint a presigned download URL
#[utoipa::path(
    get,
    path = "/api/uploads/{id}/download",
    tag = "Uploads",
    responses((status = 200, description = "Presigned URL", body = DownloadResponse)),
    security(("bearer_auth" = []))
)]
pub async fn download_url(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DownloadResponse>> {
    let download_url = state.upload_service.download_url(id, &user.actor()).await?;
    Ok(Json(DownloadResponse { download_url }))
}

/// Delete an upload (row and object)
#[utoipa::path(
    delete,
    path = "/api/uploads/{id}",
    tag = "Uploads",
    responses((status = 204, description = "Deleted")),
    security(("bearer_auth" = []))
)]
pub async fn delete_upload(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    state.upload_service.delete_upload(id, &user.actor()).await?;
    Ok(NoContent)
}

/// List a job's files (participants only)
#[utoipa::path(
    get,
    path = "/api/uploads/jobs/{job_id}",
    tag = "Uploads",
    responses((status = 200, description = "Job files", body = [UploadResponse])),
    security(("bearer_auth" = []))
)]
pub async fn list_for_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(job_id): Path<Uuid>,
) -> AppResult<Json<Vec<UploadResponse>>> {
    let uploads = state
        .upload_service
        .list_for_job(job_id, &user.actor())
        .await?;
    Ok(Json(uploads.into_iter().map(UploadResponse::from).collect()))
}
