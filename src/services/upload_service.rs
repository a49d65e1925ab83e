//! Upload service.
//!
//! Files move between the client and object storage via presigned URLs;
//! this service mints the URLs, records rows, and enforces access.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{DRAFT_KEY_PREFIX, JOB_KEY_PREFIX};
use crate::domain::{draft_file_key, job_file_key, Actor, FileUpload, Job};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{NewUpload, ObjectStorage, UnitOfWork};

/// Request for a presigned upload URL.
#[derive(Debug, Clone)]
pub struct PresignUpload {
    /// Target job (submitted jobs)
    pub job_id: Option<Uuid>,
    /// Draft token (pre-submission uploads); ignored when job_id is set
    pub draft_token: Option<String>,
    pub file_name: String,
    pub content_type: String,
}

/// A minted upload URL and the key the client must record afterwards.
#[derive(Debug, Clone)]
pub struct PresignedUpload {
    pub file_key: String,
    pub upload_url: String,
}

/// Row data recorded after the client has PUT the bytes.
#[derive(Debug, Clone)]
pub struct RecordUpload {
    pub file_key: String,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: i64,
}

/// Upload service trait for dependency injection.
#[async_trait]
pub trait UploadService: Send + Sync {
    async fn presign_upload(&self, actor: &Actor, input: PresignUpload)
        -> AppResult<PresignedUpload>;

    async fn record_upload(&self, actor: &Actor, input: RecordUpload) -> AppResult<FileUpload>;

    async fn download_url(&self, id: Uuid, actor: &Actor) -> AppResult<String>;

    async fn delete_upload(&self, id: Uuid, actor: &Actor) -> AppResult<()>;

    async fn list_for_job(&self, job_id: Uuid, actor: &Actor) -> AppResult<Vec<FileUpload>>;
}

/// Concrete implementation of UploadService.
pub struct UploadManager<U: UnitOfWork> {
    uow: Arc<U>,
    storage: Arc<dyn ObjectStorage>,
}

impl<U: UnitOfWork> UploadManager<U> {
    pub fn new(uow: Arc<U>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self { uow, storage }
    }

    async fn get_participant_job(&self, job_id: Uuid, actor: &Actor) -> AppResult<Job> {
        let job = self.uow.jobs().find_by_id(job_id).await?.ok_or_not_found()?;
        if !job.is_participant(actor) {
            return Err(AppError::Forbidden);
        }
        Ok(job)
    }

    async fn get_owned_draft(&self, draft_token: &str, actor: &Actor) -> AppResult<Job> {
        let job = self
            .uow
            .jobs()
            .find_by_draft_token(draft_token)
            .await?
            .ok_or_not_found()?;

        if job.client_id != actor.id && !actor.is_admin() {
            return Err(AppError::Forbidden);
        }
        if !job.is_draft() {
            return Err(AppError::invalid_state("Job has already been submitted"));
        }
        Ok(job)
    }

    /// May the actor read this upload?
    async fn check_read_access(&self, upload: &FileUpload, actor: &Actor) -> AppResult<()> {
        if actor.is_admin() || upload.uploader_id == actor.id {
            return Ok(());
        }
        if let Some(job_id) = upload.job_id {
            self.get_participant_job(job_id, actor).await?;
            return Ok(());
        }
        Err(AppError::Forbidden)
    }
}

#[async_trait]
impl<U: UnitOfWork> UploadService for UploadManager<U> {
    async fn presign_upload(
        &self,
        actor: &Actor,
        input: PresignUpload,
    ) -> AppResult<PresignedUpload> {
        let file_key = match input.job_id {
            Some(job_id) => {
                let job = self.get_participant_job(job_id, actor).await?;
                match job.draft_token.filter(|_| job.status == crate::domain::JobStatus::Draft) {
                    // Draft uploads stay under the draft prefix so
                    // submission can claim them
                    Some(token) => draft_file_key(&token, &input.file_name),
                    None => job_file_key(job_id, &input.file_name),
                }
            }
            None => {
                let token = input
                    .draft_token
                    .ok_or_else(|| AppError::bad_request("job_id or draft_token is required"))?;
                self.get_owned_draft(&token, actor).await?;
                draft_file_key(&token, &input.file_name)
            }
        };

        let upload_url = self
            .storage
            .presign_put(&file_key, &input.content_type)
            .await?;

        Ok(PresignedUpload {
            file_key,
            upload_url,
        })
    }

    async fn record_upload(&self, actor: &Actor, input: RecordUpload) -> AppResult<FileUpload> {
        if self.uow.uploads().find_by_key(&input.file_key).await?.is_some() {
            return Err(AppError::conflict("Upload"));
        }

        // The key encodes the association: jobs/{id}/... attaches now,
        // drafts/{token}/... is claimed at submission.
        let job_id = if let Some(rest) = input.file_key.strip_prefix(JOB_KEY_PREFIX) {
            let id_segment = rest
                .split('/')
                .next()
                .ok_or_else(|| AppError::bad_request("Malformed file key"))?;
            let job_id = Uuid::parse_str(id_segment)
                .map_err(|_| AppError::bad_request("Malformed file key"))?;
            self.get_participant_job(job_id, actor).await?;
            Some(job_id)
        } else if let Some(rest) = input.file_key.strip_prefix(DRAFT_KEY_PREFIX) {
            let token = rest
                .split('/')
                .next()
                .ok_or_else(|| AppError::bad_request("Malformed file key"))?;
            self.get_owned_draft(token, actor).await?;
            None
        } else {
            return Err(AppError::bad_request("Unrecognized file key"));
        };

        self.uow
            .uploads()
            .insert(NewUpload {
                job_id,
                uploader_id: actor.id,
                file_key: input.file_key,
                file_name: input.file_name,
                content_type: input.content_type,
                size_bytes: input.size_bytes,
            })
            .await
    }

    async fn download_url(&self, id: Uuid, actor: &Actor) -> AppResult<String> {
        let upload = self.uow.uploads().find_by_id(id).await?.ok_or_not_found()?;
        self.check_read_access(&upload, actor).await?;
        self.storage.presign_get(&upload.file_key).await
    }

    async fn delete_upload(&self, id: Uuid, actor: &Actor) -> AppResult<()> {
        let upload = self.uow.uploads().find_by_id(id).await?.ok_or_not_found()?;

        if upload.uploader_id != actor.id && !actor.is_admin() {
            return Err(AppError::Forbidden);
        }

        // Object first so a storage failure leaves the row for retry
        self.storage.delete(&upload.file_key).await?;
        self.uow.uploads().delete(id).await
    }

    async fn list_for_job(&self, job_id: Uuid, actor: &Actor) -> AppResult<Vec<FileUpload>> {
        self.get_participant_job(job_id, actor).await?;
        self.uow.uploads().list_for_job(job_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{JobStatus, UserRole};
    use crate::infra::{MockJobRepository, MockObjectStorage, MockUploadRepository};
    use crate::services::test_support::StubUnitOfWork;
    use chrono::Utc;

    fn draft_job(client_id: Uuid, token: &str) -> crate::domain::Job {
        let now = Utc::now();
        crate::domain::Job {
            id: Uuid::new_v4(),
            client_id,
            designer_id: None,
            title: String::new(),
            brief: String::new(),
            product_key: None,
            status: JobStatus::Draft,
            draft_token: Some(token.to_string()),
            submitted_at: None,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn actor() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: UserRole::Client,
        }
    }

    #[tokio::test]
    async fn presign_draft_upload_uses_draft_prefix() {
        let actor = actor();
        let client_id = actor.id;

        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_draft_token()
            .returning(move |token| Ok(Some(draft_job(client_id, token))));

        let mut storage = MockObjectStorage::new();
        storage
            .expect_presign_put()
            .returning(|key, _| Ok(format!("https://storage.example/{}", key)));

        let service = UploadManager::new(
            Arc::new(StubUnitOfWork {
                jobs: Some(Arc::new(jobs)),
                ..Default::default()
            }),
            Arc::new(storage),
        );

        let presigned = service
            .presign_upload(
                &actor,
                PresignUpload {
                    job_id: None,
                    draft_token: Some("abc123".to_string()),
                    file_name: "logo.png".to_string(),
                    content_type: "image/png".to_string(),
                },
            )
            .await
            .unwrap();

        assert_eq!(presigned.file_key, "drafts/abc123/logo.png");
        assert!(presigned.upload_url.contains("drafts/abc123/logo.png"));
    }

    #[tokio::test]
    async fn presign_rejects_foreign_draft() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_draft_token()
            .returning(|token| Ok(Some(draft_job(Uuid::new_v4(), token))));

        let service = UploadManager::new(
            Arc::new(StubUnitOfWork {
                jobs: Some(Arc::new(jobs)),
                ..Default::default()
            }),
            Arc::new(MockObjectStorage::new()),
        );

        let result = service
            .presign_upload(
                &actor(),
                PresignUpload {
                    job_id: None,
                    draft_token: Some("abc123".to_string()),
                    file_name: "logo.png".to_string(),
                    content_type: "image/png".to_string(),
                },
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden));
    }

    #[tokio::test]
    async fn record_rejects_unrecognized_key() {
        let mut uploads = MockUploadRepository::new();
        uploads.expect_find_by_key().returning(|_| Ok(None));

        let service = UploadManager::new(
            Arc::new(StubUnitOfWork {
                uploads: Some(Arc::new(uploads)),
                ..Default::default()
            }),
            Arc::new(MockObjectStorage::new()),
        );

        let result = service
            .record_upload(
                &actor(),
                RecordUpload {
                    file_key: "elsewhere/logo.png".to_string(),
                    file_name: "logo.png".to_string(),
                    content_type: "image/png".to_string(),
                    size_bytes: 1024,
                },
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn delete_requires_uploader_or_admin() {
        let upload_owner = Uuid::new_v4();
        let mut uploads = MockUploadRepository::new();
        uploads.expect_find_by_id().returning(move |id| {
            let now = Utc::now();
            Ok(Some(FileUpload {
                id,
                job_id: None,
                uploader_id: upload_owner,
                file_key: "drafts/abc123/logo.png".to_string(),
                file_name: "logo.png".to_string(),
                content_type: "image/png".to_string(),
                size_bytes: 1024,
                created_at: now,
                updated_at: now,
            }))
        });

        let service = UploadManager::new(
            Arc::new(StubUnitOfWork {
                uploads: Some(Arc::new(uploads)),
                ..Default::default()
            }),
            Arc::new(MockObjectStorage::new()),
        );

        let result = service.delete_upload(Uuid::new_v4(), &actor()).await;
        assert!(matches!(result.unwrap_err(), AppError::Forbidden));
    }
}
