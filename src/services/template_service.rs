//! Email template service.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::EmailTemplate;
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::{NewTemplate, UnitOfWork};
use crate::jobs::{EmailJob, EmailQueue};

/// Template service trait for dependency injection.
#[async_trait]
pub trait TemplateService: Send + Sync {
    async fn create_template(&self, input: NewTemplate) -> AppResult<EmailTemplate>;

    async fn get_template(&self, key: &str) -> AppResult<EmailTemplate>;

    async fn list_templates(&self) -> AppResult<Vec<EmailTemplate>>;

    async fn update_template(
        &self,
        key: &str,
        subject: Option<String>,
        body_html: Option<String>,
        body_text: Option<String>,
    ) -> AppResult<EmailTemplate>;

    async fn delete_template(&self, key: &str) -> AppResult<()>;

    /// Render with `vars` and enqueue for delivery.
    async fn send_template(
        &self,
        key: &str,
        to: String,
        vars: HashMap<String, String>,
    ) -> AppResult<()>;
}

/// Concrete implementation of TemplateService.
pub struct TemplateManager<U: UnitOfWork> {
    uow: Arc<U>,
    email_queue: Arc<dyn EmailQueue>,
}

impl<U: UnitOfWork> TemplateManager<U> {
    pub fn new(uow: Arc<U>, email_queue: Arc<dyn EmailQueue>) -> Self {
        Self { uow, email_queue }
    }
}

#[async_trait]
impl<U: UnitOfWork> TemplateService for TemplateManager<U> {
    async fn create_template(&self, input: NewTemplate) -> AppResult<EmailTemplate> {
        if input.template_key.trim().is_empty() {
            return Err(AppError::validation("Template key cannot be empty"));
        }
        if self
            .uow
            .templates()
            .find_by_key(&input.template_key)
            .await?
            .is_some()
        {
            return Err(AppError::conflict("Template"));
        }

        self.uow.templates().insert(input).await
    }

    async fn get_template(&self, key: &str) -> AppResult<EmailTemplate> {
        self.uow.templates().find_by_key(key).await?.ok_or_not_found()
    }

    async fn list_templates(&self) -> AppResult<Vec<EmailTemplate>> {
        self.uow.templates().list().await
    }

    async fn update_template(
        &self,
        key: &str,
        subject: Option<String>,
        body_html: Option<String>,
        body_text: Option<String>,
    ) -> AppResult<EmailTemplate> {
        self.uow
            .templates()
            .update(key, subject, body_html, body_text)
            .await
    }

    async fn delete_template(&self, key: &str) -> AppResult<()> {
        self.uow.templates().delete_by_key(key).await
    }

    async fn send_template(
        &self,
        key: &str,
        to: String,
        vars: HashMap<String, String>,
    ) -> AppResult<()> {
        let template = self.get_template(key).await?;
        let rendered = template.render(&vars)?;

        self.email_queue
            .enqueue(EmailJob::new(
                to,
                rendered.subject,
                rendered.body_html,
                rendered.body_text,
            ))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MockTemplateRepository;
    use crate::jobs::MockEmailQueue;
    use crate::services::test_support::StubUnitOfWork;
    use chrono::Utc;
    use uuid::Uuid;

    fn template(key: &str) -> EmailTemplate {
        let now = Utc::now();
        EmailTemplate {
            id: Uuid::new_v4(),
            template_key: key.to_string(),
            subject: "Welcome {{name}}".to_string(),
            body_html: "<p>Hi {{name}}</p>".to_string(),
            body_text: "Hi {{name}}".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn send_renders_and_enqueues() {
        let mut templates = MockTemplateRepository::new();
        templates
            .expect_find_by_key()
            .returning(|key| Ok(Some(template(key))));

        let mut queue = MockEmailQueue::new();
        queue
            .expect_enqueue()
            .times(1)
            .withf(|job| job.subject == "Welcome Ada" && job.body_text == "Hi Ada")
            .returning(|_| Ok(()));

        let service = TemplateManager::new(
            Arc::new(StubUnitOfWork {
                templates: Some(Arc::new(templates)),
                ..Default::default()
            }),
            Arc::new(queue),
        );

        let vars = HashMap::from([("name".to_string(), "Ada".to_string())]);
        service
            .send_template("welcome", "ada@example.com".to_string(), vars)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn send_with_missing_variable_fails_before_enqueue() {
        let mut templates = MockTemplateRepository::new();
        templates
            .expect_find_by_key()
            .returning(|key| Ok(Some(template(key))));

        let mut queue = MockEmailQueue::new();
        queue.expect_enqueue().times(0);

        let service = TemplateManager::new(
            Arc::new(StubUnitOfWork {
                templates: Some(Arc::new(templates)),
                ..Default::default()
            }),
            Arc::new(queue),
        );

        let result = service
            .send_template("welcome", "ada@example.com".to_string(), HashMap::new())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Unprocessable(_)));
    }

    #[tokio::test]
    async fn create_rejects_duplicate_key() {
        let mut templates = MockTemplateRepository::new();
        templates
            .expect_find_by_key()
            .returning(|key| Ok(Some(template(key))));

        let service = TemplateManager::new(
            Arc::new(StubUnitOfWork {
                templates: Some(Arc::new(templates)),
                ..Default::default()
            }),
            Arc::new(MockEmailQueue::new()),
        );

        let result = service
            .create_template(NewTemplate {
                template_key: "welcome".to_string(),
                subject: "s".to_string(),
                body_html: String::new(),
                body_text: "b".to_string(),
            })
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
    }
}
