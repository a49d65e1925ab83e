//! User management handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::domain::UserResponse;
use crate::errors::AppResult;
use crate::types::{NoContent, Paginated, PaginationParams};

/// Profile/role update request (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    /// New display name
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    /// New role: admin, client, or designer
    #[schema(example = "designer")]
    pub role: Option<String>,
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_current_user))
        .route("/", get(list_users))
        .route("/:id", get(get_user).patch(update_user).delete(delete_user))
        .route("/:id/restore", post(restore_user))
}

/// Current account profile
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses((status = 200, description = "Current profile", body = UserResponse)),
    security(("bearer_auth" = []))
)]
pub async fn get_current_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(user.id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// List users (admin)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses((status = 200, description = "Paginated users")),
    security(("bearer_auth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    require_admin(&user)?;

    let (users, total) = state.user_service.list_users(&params).await?;
    let users = users.into_iter().map(UserResponse::from).collect();

    Ok(Json(Paginated::new(users, &params, total)))
}

/// Fetch a user (admin)
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "Not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&user)?;

    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update name or role (admin)
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    tag = "Users",
    request_body = UpdateUserRequest,
    responses((status = 200, description = "Updated user", body = UserResponse)),
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&user)?;

    let user = state
        .user_service
        .update_user(id, payload.name, payload.role)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

/// Soft-delete a user (admin)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    responses((status = 204, description = "Deleted")),
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<NoContent> {
    require_admin(&user)?;

    state.user_service.delete_user(id).await?;
    Ok(NoContent)
}

/// Restore a soft-deleted user (admin)
#[utoipa::path(
    post,
    path = "/api/users/{id}/restore",
    tag = "Users",
    responses((status = 200, description = "Restored user", body = UserResponse)),
    security(("bearer_auth" = []))
)]
pub async fn restore_user(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    require_admin(&user)?;

    let user = state.user_service.restore_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}
