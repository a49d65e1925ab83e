//! Email template repository.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::email_template::{self, Entity as TemplateEntity};
use crate::domain::EmailTemplate;
use crate::errors::{AppError, AppResult};

/// New template row
#[derive(Debug, Clone)]
pub struct NewTemplate {
    pub template_key: String,
    pub subject: String,
    pub body_html: String,
    pub body_text: String,
}

/// Template repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn insert(&self, template: NewTemplate) -> AppResult<EmailTemplate>;

    async fn find_by_key(&self, template_key: &str) -> AppResult<Option<EmailTemplate>>;

    async fn update(
        &self,
        template_key: &str,
        subject: Option<String>,
        body_html: Option<String>,
        body_text: Option<String>,
    ) -> AppResult<EmailTemplate>;

    async fn delete_by_key(&self, template_key: &str) -> AppResult<()>;

    async fn list(&self) -> AppResult<Vec<EmailTemplate>>;
}

/// SeaORM-backed implementation
pub struct TemplateStore {
    db: DatabaseConnection,
}

impl TemplateStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn get_by_key(&self, template_key: &str) -> AppResult<email_template::Model> {
        TemplateEntity::find()
            .filter(email_template::Column::TemplateKey.eq(template_key))
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[async_trait]
impl TemplateRepository for TemplateStore {
    async fn insert(&self, template: NewTemplate) -> AppResult<EmailTemplate> {
        let now = chrono::Utc::now();
        let active = email_template::ActiveModel {
            id: Set(Uuid::new_v4()),
            template_key: Set(template.template_key),
            subject: Set(template.subject),
            body_html: Set(template.body_html),
            body_text: Set(template.body_text),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active.insert(&self.db).await?;
        Ok(EmailTemplate::from(model))
    }

    async fn find_by_key(&self, template_key: &str) -> AppResult<Option<EmailTemplate>> {
        let model = TemplateEntity::find()
            .filter(email_template::Column::TemplateKey.eq(template_key))
            .one(&self.db)
            .await?;
        Ok(model.map(EmailTemplate::from))
    }

    async fn update(
        &self,
        template_key: &str,
        subject: Option<String>,
        body_html: Option<String>,
        body_text: Option<String>,
    ) -> AppResult<EmailTemplate> {
        let model = self.get_by_key(template_key).await?;

        let mut active: email_template::ActiveModel = model.into();
        if let Some(subject) = subject {
            active.subject = Set(subject);
        }
        if let Some(body_html) = body_html {
            active.body_html = Set(body_html);
        }
        if let Some(body_text) = body_text {
            active.body_text = Set(body_text);
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await?;
        Ok(EmailTemplate::from(model))
    }

    async fn delete_by_key(&self, template_key: &str) -> AppResult<()> {
        let model = self.get_by_key(template_key).await?;
        let result = TemplateEntity::delete_by_id(model.id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list(&self) -> AppResult<Vec<EmailTemplate>> {
        let models = TemplateEntity::find()
            .order_by_asc(email_template::Column::TemplateKey)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(EmailTemplate::from).collect())
    }
}
