//! Job service: draft lifecycle, assignment, status transitions, and
//! the job message thread.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Actor, Job, JobStatus, Message, UserRole};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{JobScope, UnitOfWork};
use crate::types::PaginationParams;

/// Fields required to finalize a draft.
#[derive(Debug, Clone)]
pub struct SubmitJob {
    pub title: String,
    pub brief: String,
    pub product_key: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// Job service trait for dependency injection.
#[async_trait]
pub trait JobService: Send + Sync {
    /// Open a draft; the returned job carries the draft token used to
    /// prefix pre-submission upload keys.
    async fn create_draft(&self, actor: &Actor) -> AppResult<Job>;

    /// Finalize a draft and claim its uploads by key prefix.
    async fn submit_draft(&self, id: Uuid, actor: &Actor, input: SubmitJob) -> AppResult<Job>;

    async fn get_job(&self, id: Uuid, actor: &Actor) -> AppResult<Job>;

    async fn list_jobs(
        &self,
        actor: &Actor,
        status: Option<JobStatus>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Job>, u64)>;

    async fn update_status(&self, id: Uuid, actor: &Actor, status: JobStatus) -> AppResult<Job>;

    /// Admin only; the assignee must hold the designer role.
    async fn assign_designer(&self, id: Uuid, designer_id: Uuid) -> AppResult<Job>;

    async fn post_message(&self, job_id: Uuid, actor: &Actor, body: String) -> AppResult<Message>;

    async fn list_messages(&self, job_id: Uuid, actor: &Actor) -> AppResult<Vec<Message>>;
}

/// Concrete implementation of JobService.
pub struct JobManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> JobManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    async fn get_participant_job(&self, id: Uuid, actor: &Actor) -> AppResult<Job> {
        let job = self.uow.jobs().find_by_id(id).await?.ok_or_not_found()?;
        if !job.is_participant(actor) {
            return Err(AppError::Forbidden);
        }
        Ok(job)
    }
}

#[async_trait]
impl<U: UnitOfWork> JobService for JobManager<U> {
    async fn create_draft(&self, actor: &Actor) -> AppResult<Job> {
        let draft_token = Uuid::new_v4().simple().to_string();
        self.uow.jobs().create_draft(actor.id, draft_token).await
    }

    async fn submit_draft(&self, id: Uuid, actor: &Actor, input: SubmitJob) -> AppResult<Job> {
        let job = self.uow.jobs().find_by_id(id).await?.ok_or_not_found()?;

        if job.client_id != actor.id && !actor.is_admin() {
            return Err(AppError::Forbidden);
        }
        if !job.is_draft() {
            return Err(AppError::invalid_state("Job has already been submitted"));
        }

        let prefix = job
            .draft_key_prefix()
            .ok_or_else(|| AppError::internal("Draft job is missing its draft token"))?;

        // Status flip and upload claiming commit together.
        let job = self
            .uow
            .transaction(move |ctx| {
                Box::pin(async move {
                    let job = ctx
                        .jobs()
                        .mark_submitted(
                            id,
                            input.title,
                            input.brief,
                            input.product_key,
                            input.due_date,
                        )
                        .await?;

                    let claimed = ctx.uploads().claim_by_key_prefix(id, &prefix).await?;
                    tracing::info!(job_id = %id, claimed, "Draft submitted");

                    Ok(job)
                })
            })
            .await?;

        Ok(job)
    }

    async fn get_job(&self, id: Uuid, actor: &Actor) -> AppResult<Job> {
        self.get_participant_job(id, actor).await
    }

    async fn list_jobs(
        &self,
        actor: &Actor,
        status: Option<JobStatus>,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Job>, u64)> {
        let scope = match actor.role {
            UserRole::Admin => JobScope::All,
            UserRole::Designer => JobScope::Designer(actor.id),
            UserRole::Client => JobScope::Client(actor.id),
        };

        self.uow.jobs().list(scope, status, params).await
    }

    async fn update_status(&self, id: Uuid, actor: &Actor, status: JobStatus) -> AppResult<Job> {
        let job = self.uow.jobs().find_by_id(id).await?.ok_or_not_found()?;

        // Clients may only cancel their own jobs; forward progress is
        // for the assigned designer or an admin.
        let allowed = if status == JobStatus::Cancelled {
            job.is_participant(actor)
        } else {
            actor.is_admin() || (actor.is_designer() && job.designer_id == Some(actor.id))
        };
        if !allowed {
            return Err(AppError::Forbidden);
        }

        if !job.status.can_transition(status) {
            return Err(AppError::invalid_state(format!(
                "Cannot move job from {} to {}",
                job.status, status
            )));
        }

        self.uow.jobs().update_status(id, status).await
    }

    async fn assign_designer(&self, id: Uuid, designer_id: Uuid) -> AppResult<Job> {
        let job = self.uow.jobs().find_by_id(id).await?.ok_or_not_found()?;
        if job.status.is_terminal() {
            return Err(AppError::invalid_state("Job is already closed"));
        }

        let designer = self
            .uow
            .users()
            .find_by_id(designer_id)
            .await?
            .ok_or_not_found()?;
        if !designer.role.is_designer() {
            return Err(AppError::validation("Assignee is not a designer"));
        }

        self.uow.jobs().assign_designer(id, designer_id).await
    }

    async fn post_message(&self, job_id: Uuid, actor: &Actor, body: String) -> AppResult<Message> {
        let body = body.trim().to_string();
        if body.is_empty() {
            return Err(AppError::validation("Message body cannot be empty"));
        }

        self.get_participant_job(job_id, actor).await?;
        self.uow.messages().insert(job_id, actor.id, body).await
    }

    async fn list_messages(&self, job_id: Uuid, actor: &Actor) -> AppResult<Vec<Message>> {
        self.get_participant_job(job_id, actor).await?;
        self.uow.messages().list_for_job(job_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::{MockJobRepository, MockUserRepository};
    use crate::services::test_support::StubUnitOfWork;

    fn job(client_id: Uuid, status: JobStatus) -> Job {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            client_id,
            designer_id: None,
            title: "Logo refresh".to_string(),
            brief: "New logo".to_string(),
            product_key: None,
            status,
            draft_token: Some("abc123".to_string()),
            submitted_at: None,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn client_actor() -> Actor {
        Actor {
            id: Uuid::new_v4(),
            role: UserRole::Client,
        }
    }

    #[tokio::test]
    async fn get_job_denies_non_participant() {
        let other_client = Uuid::new_v4();
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id()
            .returning(move |_| Ok(Some(job(other_client, JobStatus::Submitted))));

        let service = JobManager::new(Arc::new(StubUnitOfWork {
            jobs: Some(Arc::new(jobs)),
            ..Default::default()
        }));

        let result = service.get_job(Uuid::new_v4(), &client_actor()).await;
        assert!(matches!(result.unwrap_err(), AppError::Forbidden));
    }

    #[tokio::test]
    async fn submit_rejects_non_draft() {
        let actor = client_actor();
        let client_id = actor.id;
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id()
            .returning(move |_| Ok(Some(job(client_id, JobStatus::Submitted))));

        let service = JobManager::new(Arc::new(StubUnitOfWork {
            jobs: Some(Arc::new(jobs)),
            ..Default::default()
        }));

        let result = service
            .submit_draft(
                Uuid::new_v4(),
                &actor,
                SubmitJob {
                    title: "t".to_string(),
                    brief: "b".to_string(),
                    product_key: None,
                    due_date: None,
                },
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn update_status_rejects_illegal_transition() {
        let actor = Actor {
            id: Uuid::new_v4(),
            role: UserRole::Admin,
        };
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id()
            .returning(|_| Ok(Some(job(Uuid::new_v4(), JobStatus::Submitted))));

        let service = JobManager::new(Arc::new(StubUnitOfWork {
            jobs: Some(Arc::new(jobs)),
            ..Default::default()
        }));

        let result = service
            .update_status(Uuid::new_v4(), &actor, JobStatus::Completed)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidState(_)));
    }

    #[tokio::test]
    async fn assign_rejects_non_designer() {
        let mut jobs = MockJobRepository::new();
        jobs.expect_find_by_id()
            .returning(|_| Ok(Some(job(Uuid::new_v4(), JobStatus::Submitted))));

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| {
            let now = Utc::now();
            Ok(Some(crate::domain::User {
                id,
                email: "client@example.com".to_string(),
                password_hash: "hashed".to_string(),
                name: "Client".to_string(),
                role: UserRole::Client,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            }))
        });

        let service = JobManager::new(Arc::new(StubUnitOfWork {
            jobs: Some(Arc::new(jobs)),
            users: Some(Arc::new(users)),
            ..Default::default()
        }));

        let result = service.assign_designer(Uuid::new_v4(), Uuid::new_v4()).await;
        assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
    }
}
