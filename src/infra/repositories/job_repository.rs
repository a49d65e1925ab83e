//! Job repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};
use uuid::Uuid;

use super::entities::job::{self, Entity as JobEntity};
use crate::domain::{Job, JobStatus};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Listing scope derived from the caller's role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobScope {
    All,
    Client(Uuid),
    Designer(Uuid),
}

/// Job repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create_draft(&self, client_id: Uuid, draft_token: String) -> AppResult<Job>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>>;

    async fn find_by_draft_token(&self, draft_token: &str) -> AppResult<Option<Job>>;

    async fn list(
        &self,
        scope: JobScope,
        status: Option<JobStatus>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Job>, u64)>;

    async fn update_status(&self, id: Uuid, status: JobStatus) -> AppResult<Job>;

    async fn assign_designer(&self, id: Uuid, designer_id: Uuid) -> AppResult<Job>;

    /// Drafts untouched since `cutoff`, oldest first (sweep input)
    async fn list_stale_drafts(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Job>>;

    /// Hard delete; messages cascade, upload rows are removed separately
    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

fn scoped(query: Select<JobEntity>, scope: JobScope) -> Select<JobEntity> {
    match scope {
        JobScope::All => query,
        JobScope::Client(id) => query.filter(job::Column::ClientId.eq(id)),
        JobScope::Designer(id) => query.filter(job::Column::DesignerId.eq(id)),
    }
}

/// SeaORM-backed implementation
pub struct JobStore {
    db: DatabaseConnection,
}

impl JobStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl JobRepository for JobStore {
    async fn create_draft(&self, client_id: Uuid, draft_token: String) -> AppResult<Job> {
        let now = Utc::now();
        let active = job::ActiveModel {
            id: Set(Uuid::new_v4()),
            client_id: Set(client_id),
            designer_id: Set(None),
            title: Set(String::new()),
            brief: Set(String::new()),
            product_key: Set(None),
            status: Set(JobStatus::Draft.to_string()),
            draft_token: Set(Some(draft_token)),
            submitted_at: Set(None),
            due_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        Ok(Job::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Job>> {
        let model = JobEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Job::from))
    }

    async fn find_by_draft_token(&self, draft_token: &str) -> AppResult<Option<Job>> {
        let model = JobEntity::find()
            .filter(job::Column::DraftToken.eq(draft_token))
            .one(&self.db)
            .await?;
        Ok(model.map(Job::from))
    }

    async fn list(
        &self,
        scope: JobScope,
        status: Option<JobStatus>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Job>, u64)> {
        let mut query = scoped(JobEntity::find(), scope);
        if let Some(status) = status {
            query = query.filter(job::Column::Status.eq(status.to_string()));
        }

        let paginator = query
            .order_by_desc(job::Column::CreatedAt)
            .paginate(&self.db, params.limit());

        let total = paginator.num_items().await?;
        let models = paginator.fetch_page(params.page_index()).await?;
        Ok((models.into_iter().map(Job::from).collect(), total))
    }

    async fn update_status(&self, id: Uuid, status: JobStatus) -> AppResult<Job> {
        let model = JobEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: job::ActiveModel = model.into();
        active.status = Set(status.to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Job::from(model))
    }

    async fn assign_designer(&self, id: Uuid, designer_id: Uuid) -> AppResult<Job> {
        let model = JobEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: job::ActiveModel = model.into();
        active.designer_id = Set(Some(designer_id));
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Job::from(model))
    }

    async fn list_stale_drafts(&self, cutoff: DateTime<Utc>) -> AppResult<Vec<Job>> {
        let models = JobEntity::find()
            .filter(job::Column::Status.eq(JobStatus::Draft.to_string()))
            .filter(job::Column::UpdatedAt.lt(cutoff))
            .order_by_asc(job::Column::UpdatedAt)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Job::from).collect())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = JobEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
