//! Email background job.
//!
//! Job payloads are enqueued by services and delivered by the worker
//! through the SMTP mailer.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::infra::{Mailer, OutgoingEmail, SmtpMailer};

/// Email job payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailJob {
    /// Recipient email address
    pub to: String,
    /// Email subject line
    pub subject: String,
    /// HTML body (may be empty for text-only mail)
    #[serde(default)]
    pub body_html: String,
    /// Plain-text body
    pub body_text: String,
}

impl EmailJob {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        body_html: impl Into<String>,
        body_text: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            body_html: body_html.into(),
            body_text: body_text.into(),
        }
    }
}

/// Email job handler - delivers queued mail through SMTP.
pub async fn email_job_handler(job: EmailJob) -> Result<(), AppError> {
    tracing::info!(to = %job.to, subject = %job.subject, "Processing email job");

    let mailer = SmtpMailer::from_env()?;
    let email = OutgoingEmail {
        to: job.to,
        subject: job.subject,
        body_html: job.body_html,
        body_text: job.body_text,
    };

    mailer.send(&email).await
}
