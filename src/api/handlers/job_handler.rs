//! Job and job-message handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Extension, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::{JobMessageResponse, JobResponse, JobStatus};
use crate::errors::AppResult;
use crate::services::SubmitJob;
use crate::types::{Paginated, PaginationParams};

/// Draft submission request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SubmitJobRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    #[schema(example = "Tri-fold brochure")]
    pub title: String,
    #[validate(length(min = 1, message = "Brief is required"))]
    #[schema(example = "A5 brochure for the spring campaign, brand colors")]
    pub brief: String,
    #[schema(example = "brochure")]
    pub product_key: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Status change request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusRequest {
    #[schema(example = "in_progress")]
    pub status: JobStatus,
}

/// Designer assignment request (admin)
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignDesignerRequest {
    pub designer_id: Uuid,
}

/// Message post request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PostMessageRequest {
    #[validate(length(min = 1, message = "Message body cannot be empty"))]
    #[schema(example = "First proof attached, let me know what you think.")]
    pub body: String,
}

/// Job list filters
#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub status: Option<JobStatus>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl JobListQuery {
    fn pagination(&self) -> PaginationParams {
        let defaults = PaginationParams::default();
        PaginationParams {
            page: self.page.unwrap_or(defaults.page),
            per_page: self.per_page.unwrap_or(defaults.per_page),
        }
    }
}

/// Create job routes
pub fn job_routes() -> Router<AppState> {
    Router::new()
        .route("/drafts", post(create_draft))
        .route("/drafts/:id/submit", post(submit_draft))
        .route("/", get(list_jobs))
        .route("/:id", get(get_job))
        .route("/:id/status", patch(update_status))
        .route("/:id/assign", patch(assign_designer))
        .route("/:id/messages", get(list_messages).post(post_message))
}

/// Open a draft job
#[utoipa::path(
    post,
    path = "/api/jobs/drafts",
    tag = "Jobs",
    responses((status = 201, description = "Draft created", body = JobResponse)),
    security(("bearer_auth" = []))
)]
pub async fn create_draft(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<(StatusCode, Json<JobResponse>)> {
    let job = state.job_service.create_draft(&user.actor()).await?;
    Ok((StatusCode::CREATED, Json(JobResponse::from(job))))
}

/// Submit a draft; claims its pending uploads by key prefix
#[utoipa::path(
    post,
    path = "/api/jobs/drafts/{id}/submit",
    tag = "Jobs",
    request_body = SubmitJobRequest,
    responses(
        (status = 200, description = "Job submitted", body = JobResponse),
        (status = 409, description = "Job is not a draft")
    ),
    security(("bearer_auth" = []))
)]
pub async fn submit_draft(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SubmitJobRequest>,
) -> AppResult<Json<JobResponse>> {
    let job = state
        .job_service
        .submit_draft(
            id,
            &user.actor(),
            SubmitJob {
                title: payload.title,
                brief: payload.brief,
                product_key: payload.product_key,
                due_date: payload.due_date,
            },
        )
        .await?;

    Ok(Json(JobResponse::from(job)))
}

/// Role-scoped job listing
#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Jobs",
    responses((status = 200, description = "Paginated jobs")),
    security(("bearer_auth" = []))
)]
pub async fn list_jobs(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<JobListQuery>,
) -> AppResult<Json<Paginated<JobResponse>>> {
    let params = query.pagination();
    let (jobs, total) = state
        .job_service
        .list_jobs(&user.actor(), query.status, &params)
        .await?;

    let jobs = jobs.into_iter().map(JobResponse::from).collect();
    Ok(Json(Paginated::new(jobs, &params, total)))
}

/// Fetch a job (participants only)
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    responses(
        (status = 200, description = "Job", body = JobResponse),
        (status = 403, description = "Not a participant"),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_job(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<JobResponse>> {
    let job = state.job_service.get_job(id, &user.actor()).await?;
    Ok(Json(JobResponse::from(job)))
}

/// Progress the job lifecycle
#[utoipa::path(
    patch,
    path = "/api/jobs/{id}/status",
    tag = "Jobs",
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Updated job", body = JobResponse),
        (status = 409, description = "Illegal transition")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<Json<JobResponse>> {
    let job = state
        .job_service
        .update_status(id, &user.actor(), payload.status)
        .await?;
    Ok(Json(JobResponse::from(job)))
}

/// Assign a designer (admin)
#[utoipa::path(
    patch,
    path = "/api/jobs/{id}/assign",
    tag = "Jobs",
    request_body = AssignDesignerRequest,
    responses((status = 200, description = "Updated job", body = JobResponse)),
    security(("bearer_auth" = []))
)]
pub async fn assign_designer(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignDesignerRequest>,
) -> AppResult<Json<JobResponse>> {
    require_admin(&user)?;

    let job = state
        .job_service
        .assign_designer(id, payload.designer_id)
        .await?;
    Ok(Json(JobResponse::from(job)))
}

/// Job message thread (participants only)
#[utoipa::path(
    get,
    path = "/api/jobs/{id}/messages",
    tag = "Jobs",
    responses((status = 200, description = "Messages", body = [JobMessageResponse])),
    security(("bearer_auth" = []))
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<JobMessageResponse>>> {
    let messages = state.job_service.list_messages(id, &user.actor()).await?;
    Ok(Json(
        messages.into_iter().map(JobMessageResponse::from).collect(),
    ))
}

/// Post to the job message thread
#[utoipa::path(
    post,
    path = "/api/jobs/{id}/messages",
    tag = "Jobs",
    request_body = PostMessageRequest,
    responses((status = 201, description = "Message posted", body = JobMessageResponse)),
    security(("bearer_auth" = []))
)]
pub async fn post_message(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<PostMessageRequest>,
) -> AppResult<(StatusCode, Json<JobMessageResponse>)> {
    let message = state
        .job_service
        .post_message(id, &user.actor(), payload.body)
        .await?;
    Ok((StatusCode::CREATED, Json(JobMessageResponse::from(message))))
}
