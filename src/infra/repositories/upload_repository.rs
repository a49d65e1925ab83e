//! File upload repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::file_upload::{self, Entity as UploadEntity};
use crate::domain::FileUpload;
use crate::errors::{AppError, AppResult};

/// New upload row
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub job_id: Option<Uuid>,
    pub uploader_id: Uuid,
    pub file_key: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
}

/// Upload repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait UploadRepository: Send + Sync {
    async fn insert(&self, upload: NewUpload) -> AppResult<FileUpload>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileUpload>>;

    async fn find_by_key(&self, file_key: &str) -> AppResult<Option<FileUpload>>;

    async fn list_for_job(&self, job_id: Uuid) -> AppResult<Vec<FileUpload>>;

    /// All rows whose storage key starts with `prefix`, claimed or not
    async fn list_by_key_prefix(&self, prefix: &str) -> AppResult<Vec<FileUpload>>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;
}

/// SeaORM-backed implementation
pub struct UploadStore {
    db: DatabaseConnection,
}

impl UploadStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UploadRepository for UploadStore {
    async fn insert(&self, upload: NewUpload) -> AppResult<FileUpload> {
        let now = chrono::Utc::now();
        let active = file_upload::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(upload.job_id),
            uploader_id: Set(upload.uploader_id),
            file_key: Set(upload.file_key),
            file_name: Set(upload.file_name),
            content_type: Set(upload.content_type),
            size_bytes: Set(upload.size_bytes),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        Ok(FileUpload::from(model))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileUpload>> {
        let model = UploadEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(FileUpload::from))
    }

    async fn find_by_key(&self, file_key: &str) -> AppResult<Option<FileUpload>> {
        let model = UploadEntity::find()
            .filter(file_upload::Column::FileKey.eq(file_key))
            .one(&self.db)
            .await?;
        Ok(model.map(FileUpload::from))
    }

    async fn list_for_job(&self, job_id: Uuid) -> AppResult<Vec<FileUpload>> {
        let models = UploadEntity::find()
            .filter(file_upload::Column::JobId.eq(job_id))
            .order_by_asc(file_upload::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(FileUpload::from).collect())
    }

    async fn list_by_key_prefix(&self, prefix: &str) -> AppResult<Vec<FileUpload>> {
        let models = UploadEntity::find()
            .filter(file_upload::Column::FileKey.like(format!("{}%", escape_like(prefix))))
            .order_by_asc(file_upload::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(FileUpload::from).collect())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UploadEntity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}

/// Escape LIKE metacharacters so a key prefix matches literally.
pub(crate) fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like("drafts/ab_c/"), "drafts/ab\\_c/");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("plain/"), "plain/");
    }
}
