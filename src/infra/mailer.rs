//! SMTP mailer.
//!
//! Sends through a configured SMTP relay; when SMTP is unconfigured
//! (development), outgoing mail is logged instead of sent.

use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::errors::{AppError, AppResult};

/// A fully-rendered outgoing email.
#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body_html: String,
    pub body_text: String,
}

/// Mailer trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> AppResult<()>;
}

/// SMTP configuration from environment.
struct SmtpConfig {
    host: Option<String>,
    port: u16,
    user: Option<String>,
    pass: Option<String>,
    from: String,
}

impl SmtpConfig {
    fn from_env() -> Self {
        Self {
            host: std::env::var("SMTP_HOST").ok(),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            user: std::env::var("SMTP_USER").ok(),
            pass: std::env::var("SMTP_PASS").ok(),
            from: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| "noreply@studio-portal.example".to_string()),
        }
    }
}

/// lettre-backed SMTP mailer.
pub struct SmtpMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
}

impl SmtpMailer {
    /// Build from SMTP_* environment variables. Without SMTP_HOST the
    /// mailer runs in log-only mode.
    pub fn from_env() -> AppResult<Self> {
        let config = SmtpConfig::from_env();

        let transport = match &config.host {
            Some(host) => {
                let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                    .map_err(|e| AppError::mail(format!("SMTP relay setup failed: {}", e)))?
                    .port(config.port);

                if let (Some(user), Some(pass)) = (&config.user, &config.pass) {
                    builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
                }

                Some(builder.build())
            }
            None => None,
        };

        Ok(Self {
            transport,
            from: config.from,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> AppResult<()> {
        let Some(transport) = &self.transport else {
            // Development mode: log the email instead of sending
            tracing::warn!("SMTP not configured - logging email instead of sending");
            tracing::info!(
                "=== EMAIL (not sent) ===\n\
                 From: {}\n\
                 To: {}\n\
                 Subject: {}\n\
                 Body:\n{}\n\
                 ========================",
                self.from,
                email.to,
                email.subject,
                email.body_text
            );
            return Ok(());
        };

        let from: Mailbox = self
            .from
            .parse()
            .map_err(|e| AppError::mail(format!("Invalid sender address: {}", e)))?;
        let to: Mailbox = email
            .to
            .parse()
            .map_err(|e| AppError::mail(format!("Invalid recipient address: {}", e)))?;

        let builder = Message::builder()
            .from(from)
            .to(to)
            .subject(&email.subject);

        let message = if email.body_html.is_empty() {
            builder
                .header(ContentType::TEXT_PLAIN)
                .body(email.body_text.clone())
        } else {
            builder.multipart(MultiPart::alternative_plain_html(
                email.body_text.clone(),
                email.body_html.clone(),
            ))
        }
        .map_err(|e| AppError::mail(format!("Failed to build message: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::mail(format!("SMTP send failed: {}", e)))?;

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}
