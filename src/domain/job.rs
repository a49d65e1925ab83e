//! Design job entity and lifecycle rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::DRAFT_KEY_PREFIX;

/// Job lifecycle states.
///
/// The happy path is draft -> submitted -> in_progress -> in_review ->
/// completed; cancellation is allowed from any non-terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Draft,
    Submitted,
    InProgress,
    InReview,
    Completed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }

    /// Whether a transition to `next` is legal.
    pub fn can_transition(&self, next: JobStatus) -> bool {
        if next == JobStatus::Cancelled {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (JobStatus::Draft, JobStatus::Submitted)
                | (JobStatus::Submitted, JobStatus::InProgress)
                | (JobStatus::InProgress, JobStatus::InReview)
                | (JobStatus::InReview, JobStatus::InProgress)
                | (JobStatus::InReview, JobStatus::Completed)
        )
    }
}

impl From<&str> for JobStatus {
    fn from(s: &str) -> Self {
        match s {
            "submitted" => JobStatus::Submitted,
            "in_progress" => JobStatus::InProgress,
            "in_review" => JobStatus::InReview,
            "completed" => JobStatus::Completed,
            "cancelled" => JobStatus::Cancelled,
            _ => JobStatus::Draft,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobStatus::Draft => "draft",
            JobStatus::Submitted => "submitted",
            JobStatus::InProgress => "in_progress",
            JobStatus::InReview => "in_review",
            JobStatus::Completed => "completed",
            JobStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

/// Design job domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub client_id: Uuid,
    pub designer_id: Option<Uuid>,
    pub title: String,
    pub brief: String,
    pub product_key: Option<String>,
    pub status: JobStatus,
    /// Token prefixing storage keys of uploads made before submission
    pub draft_token: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn is_draft(&self) -> bool {
        self.status == JobStatus::Draft
    }

    /// Whether the actor may see and message this job.
    pub fn is_participant(&self, actor: &super::Actor) -> bool {
        actor.is_admin() || self.client_id == actor.id || self.designer_id == Some(actor.id)
    }

    /// Storage-key prefix that claims this draft's uploads on submission.
    pub fn draft_key_prefix(&self) -> Option<String> {
        self.draft_token
            .as_ref()
            .map(|token| format!("{}{}/", DRAFT_KEY_PREFIX, token))
    }
}

/// Job response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct JobResponse {
    pub id: Uuid,
    pub client_id: Uuid,
    pub designer_id: Option<Uuid>,
    #[schema(example = "Tri-fold brochure")]
    pub title: String,
    pub brief: String,
    #[schema(example = "brochure")]
    pub product_key: Option<String>,
    #[schema(example = "draft")]
    pub status: String,
    /// Present only while the job is a draft
    pub draft_token: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        let draft_token = if job.is_draft() { job.draft_token } else { None };
        Self {
            id: job.id,
            client_id: job.client_id,
            designer_id: job.designer_id,
            title: job.title,
            brief: job.brief,
            product_key: job.product_key,
            status: job.status.to_string(),
            draft_token,
            submitted_at: job.submitted_at,
            due_date: job.due_date,
            created_at: job.created_at,
            updated_at: job.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        assert!(JobStatus::Draft.can_transition(JobStatus::Submitted));
        assert!(JobStatus::Submitted.can_transition(JobStatus::InProgress));
        assert!(JobStatus::InProgress.can_transition(JobStatus::InReview));
        assert!(JobStatus::InReview.can_transition(JobStatus::InProgress));
        assert!(JobStatus::InReview.can_transition(JobStatus::Completed));
    }

    #[test]
    fn illegal_transitions_rejected() {
        assert!(!JobStatus::Draft.can_transition(JobStatus::InProgress));
        assert!(!JobStatus::Submitted.can_transition(JobStatus::Completed));
        assert!(!JobStatus::Completed.can_transition(JobStatus::InProgress));
    }

    #[test]
    fn cancel_only_from_non_terminal() {
        assert!(JobStatus::Draft.can_transition(JobStatus::Cancelled));
        assert!(JobStatus::InReview.can_transition(JobStatus::Cancelled));
        assert!(!JobStatus::Completed.can_transition(JobStatus::Cancelled));
        assert!(!JobStatus::Cancelled.can_transition(JobStatus::Cancelled));
    }

    #[test]
    fn status_string_round_trip() {
        for status in [
            JobStatus::Draft,
            JobStatus::Submitted,
            JobStatus::InProgress,
            JobStatus::InReview,
            JobStatus::Completed,
            JobStatus::Cancelled,
        ] {
            assert_eq!(JobStatus::from(status.to_string().as_str()), status);
        }
    }
}
