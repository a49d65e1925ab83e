//! Draft cleanup sweep.
//!
//! Deletes draft jobs idle past the retention horizon, together with
//! their storage objects and upload rows. Runs daily from the worker's
//! cron stream and on demand via `jobs sweep`.

use std::sync::Arc;

use apalis::prelude::Data;
use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;

use crate::config::DRAFT_RETENTION_DAYS;
use crate::domain::Job;
use crate::errors::{AppError, AppResult};
use crate::infra::{JobRepository, JobStore, ObjectStorage, UploadRepository, UploadStore};

/// Cron tick payload for the scheduled sweep.
#[derive(Debug, Clone)]
pub struct CleanupTick(pub DateTime<Utc>);

impl From<DateTime<Utc>> for CleanupTick {
    fn from(t: DateTime<Utc>) -> Self {
        CleanupTick(t)
    }
}

/// What a sweep did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepOutcome {
    pub removed: u64,
    pub skipped: u64,
}

/// Everything the sweep needs to do its work.
pub struct CleanupContext {
    jobs: Arc<dyn JobRepository>,
    uploads: Arc<dyn UploadRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl CleanupContext {
    pub fn new(db: DatabaseConnection, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            jobs: Arc::new(JobStore::new(db.clone())),
            uploads: Arc::new(UploadStore::new(db)),
            storage,
        }
    }

    /// Build with explicit repositories (tests).
    pub fn with_repositories(
        jobs: Arc<dyn JobRepository>,
        uploads: Arc<dyn UploadRepository>,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            jobs,
            uploads,
            storage,
        }
    }

    /// Delete every draft untouched for the retention period.
    ///
    /// A failure on one draft (usually storage) skips it; the next
    /// sweep picks it up again.
    pub async fn sweep(&self) -> AppResult<SweepOutcome> {
        let cutoff = Utc::now() - Duration::days(DRAFT_RETENTION_DAYS);
        let stale = self.jobs.list_stale_drafts(cutoff).await?;

        let mut outcome = SweepOutcome {
            removed: 0,
            skipped: 0,
        };

        for job in stale {
            match self.remove_draft(&job).await {
                Ok(()) => outcome.removed += 1,
                Err(e) => {
                    tracing::warn!(job_id = %job.id, error = %e, "Skipping draft during sweep");
                    outcome.skipped += 1;
                }
            }
        }

        tracing::info!(
            removed = outcome.removed,
            skipped = outcome.skipped,
            "Draft sweep finished"
        );
        Ok(outcome)
    }

    async fn remove_draft(&self, job: &Job) -> AppResult<()> {
        // Storage objects first: if a delete fails the rows stay and the
        // draft is retried on the next sweep.
        if let Some(prefix) = job.draft_key_prefix() {
            for upload in self.uploads.list_by_key_prefix(&prefix).await? {
                self.storage.delete(&upload.file_key).await?;
                self.uploads.delete(upload.id).await?;
            }
        }

        self.jobs.delete(job.id).await
    }
}

/// Cron handler - runs the sweep on every tick.
pub async fn draft_cleanup_handler(
    tick: CleanupTick,
    ctx: Data<Arc<CleanupContext>>,
) -> Result<(), AppError> {
    tracing::info!(fired_at = %tick.0, "Draft cleanup tick");
    ctx.sweep().await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FileUpload, JobStatus};
    use crate::infra::{MockJobRepository, MockObjectStorage, MockUploadRepository};
    use uuid::Uuid;

    fn stale_draft(token: &str) -> Job {
        let old = Utc::now() - Duration::days(DRAFT_RETENTION_DAYS + 5);
        Job {
            id: Uuid::new_v4(),
            client_id: Uuid::new_v4(),
            designer_id: None,
            title: String::new(),
            brief: String::new(),
            product_key: None,
            status: JobStatus::Draft,
            draft_token: Some(token.to_string()),
            submitted_at: None,
            due_date: None,
            created_at: old,
            updated_at: old,
        }
    }

    fn upload(key: &str) -> FileUpload {
        let now = Utc::now();
        FileUpload {
            id: Uuid::new_v4(),
            job_id: None,
            uploader_id: Uuid::new_v4(),
            file_key: key.to_string(),
            file_name: "logo.png".to_string(),
            content_type: "image/png".to_string(),
            size_bytes: 1024,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn sweep_removes_stale_drafts_and_their_files() {
        let draft = stale_draft("abc123");
        let draft_id = draft.id;

        let mut jobs = MockJobRepository::new();
        jobs.expect_list_stale_drafts()
            .returning(move |_| Ok(vec![draft.clone()]));
        jobs.expect_delete()
            .times(1)
            .withf(move |id| *id == draft_id)
            .returning(|_| Ok(()));

        let mut uploads = MockUploadRepository::new();
        uploads
            .expect_list_by_key_prefix()
            .withf(|prefix| prefix == "drafts/abc123/")
            .returning(|prefix| Ok(vec![upload(&format!("{}logo.png", prefix))]));
        uploads.expect_delete().times(1).returning(|_| Ok(()));

        let mut storage = MockObjectStorage::new();
        storage
            .expect_delete()
            .times(1)
            .withf(|key| key == "drafts/abc123/logo.png")
            .returning(|_| Ok(()));

        let ctx = CleanupContext::with_repositories(
            Arc::new(jobs),
            Arc::new(uploads),
            Arc::new(storage),
        );

        let outcome = ctx.sweep().await.unwrap();
        assert_eq!(outcome.removed, 1);
        assert_eq!(outcome.skipped, 0);
    }

    #[tokio::test]
    async fn sweep_skips_draft_on_storage_failure() {
        let draft = stale_draft("abc123");

        let mut jobs = MockJobRepository::new();
        jobs.expect_list_stale_drafts()
            .returning(move |_| Ok(vec![draft.clone()]));
        // The job row must survive so the next sweep retries it
        jobs.expect_delete().times(0);

        let mut uploads = MockUploadRepository::new();
        uploads
            .expect_list_by_key_prefix()
            .returning(|prefix| Ok(vec![upload(&format!("{}logo.png", prefix))]));
        uploads.expect_delete().times(0);

        let mut storage = MockObjectStorage::new();
        storage
            .expect_delete()
            .returning(|_| Err(crate::errors::AppError::storage("bucket unavailable")));

        let ctx = CleanupContext::with_repositories(
            Arc::new(jobs),
            Arc::new(uploads),
            Arc::new(storage),
        );

        let outcome = ctx.sweep().await.unwrap();
        assert_eq!(outcome.removed, 0);
        assert_eq!(outcome.skipped, 1);
    }

    #[tokio::test]
    async fn sweep_with_no_stale_drafts_is_a_noop() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_list_stale_drafts().returning(|_| Ok(vec![]));

        let ctx = CleanupContext::with_repositories(
            Arc::new(jobs),
            Arc::new(MockUploadRepository::new()),
            Arc::new(MockObjectStorage::new()),
        );

        let outcome = ctx.sweep().await.unwrap();
        assert_eq!(outcome.removed, 0);
        assert_eq!(outcome.skipped, 0);
    }
}
