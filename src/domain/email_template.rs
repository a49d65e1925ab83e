//! Email template entity and placeholder rendering.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Stored email template. Subject and bodies may contain `{{name}}`
/// placeholders substituted at send time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailTemplate {
    pub id: Uuid,
    pub template_key: String,
    pub subject: String,
    pub body_html: String,
    pub body_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A template with all placeholders resolved, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body_html: String,
    pub body_text: String,
}

impl EmailTemplate {
    /// Render the template with the given variables.
    ///
    /// Every `{{name}}` placeholder must be present in `vars`; an
    /// unresolved placeholder is an error so typos surface at send time
    /// instead of reaching a customer.
    pub fn render(&self, vars: &HashMap<String, String>) -> AppResult<RenderedEmail> {
        Ok(RenderedEmail {
            subject: substitute(&self.subject, vars)?,
            body_html: substitute(&self.body_html, vars)?,
            body_text: substitute(&self.body_text, vars)?,
        })
    }
}

/// Replace `{{name}}` placeholders in `input` from `vars`.
fn substitute(input: &str, vars: &HashMap<String, String>) -> AppResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after.find("}}").ok_or_else(|| {
            AppError::unprocessable("Unclosed placeholder in template".to_string())
        })?;

        let name = after[..end].trim();
        let value = vars.get(name).ok_or_else(|| {
            AppError::unprocessable(format!("Missing template variable: {}", name))
        })?;
        out.push_str(value);

        rest = &after[end + 2..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Template response DTO
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TemplateResponse {
    pub id: Uuid,
    #[schema(example = "order-confirmation")]
    pub template_key: String,
    #[schema(example = "Your order {{order_id}} is confirmed")]
    pub subject: String,
    pub body_html: String,
    pub body_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<EmailTemplate> for TemplateResponse {
    fn from(t: EmailTemplate) -> Self {
        Self {
            id: t.id,
            template_key: t.template_key,
            subject: t.subject,
            body_html: t.body_html,
            body_text: t.body_text,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(subject: &str, html: &str, text: &str) -> EmailTemplate {
        EmailTemplate {
            id: Uuid::new_v4(),
            template_key: "welcome".to_string(),
            subject: subject.to_string(),
            body_html: html.to_string(),
            body_text: text.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn renders_placeholders() {
        let t = template(
            "Hello {{name}}",
            "<p>Hi {{name}}, total {{total}}</p>",
            "Hi {{ name }}",
        );
        let rendered = t
            .render(&vars(&[("name", "Ada"), ("total", "$42.00")]))
            .unwrap();

        assert_eq!(rendered.subject, "Hello Ada");
        assert_eq!(rendered.body_html, "<p>Hi Ada, total $42.00</p>");
        assert_eq!(rendered.body_text, "Hi Ada");
    }

    #[test]
    fn missing_variable_is_unprocessable() {
        let t = template("Hello {{name}}", "", "");
        let err = t.render(&HashMap::new()).unwrap_err();
        assert!(matches!(err, AppError::Unprocessable(_)));
    }

    #[test]
    fn unclosed_placeholder_is_an_error() {
        let t = template("Hello {{name", "", "");
        assert!(t.render(&vars(&[("name", "Ada")])).is_err());
    }

    #[test]
    fn text_without_placeholders_passes_through() {
        let t = template("Plain subject", "body", "body");
        let rendered = t.render(&HashMap::new()).unwrap();
        assert_eq!(rendered.subject, "Plain subject");
    }
}
