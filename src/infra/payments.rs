//! Payment provider client.
//!
//! Talks to a Stripe-style payment-intent API over HTTP. Without a
//! secret key configured (development), intents are fabricated locally
//! and immediately succeed.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Prefix marking locally fabricated development intents.
const DEV_INTENT_PREFIX: &str = "pi_dev_";

/// A payment intent as reported by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: Option<String>,
    pub status: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub currency: String,
}

/// Payment provider trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create an intent for the given amount; `reference` is attached
    /// as metadata for reconciliation.
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        reference: &str,
    ) -> AppResult<PaymentIntent>;

    /// Fetch the current state of an intent.
    async fn fetch_intent(&self, intent_id: &str) -> AppResult<PaymentIntent>;
}

/// HTTP implementation against the configured provider API.
pub struct HttpPaymentProvider {
    http: reqwest::Client,
    base_url: String,
    secret_key: Option<String>,
}

impl HttpPaymentProvider {
    pub fn new(config: &Config) -> Self {
        if config.payment_secret_key.is_none() {
            tracing::warn!(
                "PAYMENT_SECRET_KEY not set - payment intents will be fabricated locally"
            );
        }

        Self {
            http: reqwest::Client::new(),
            base_url: config.payment_api_url.trim_end_matches('/').to_string(),
            secret_key: config.payment_secret_key.clone(),
        }
    }
}

#[async_trait]
impl PaymentProvider for HttpPaymentProvider {
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        reference: &str,
    ) -> AppResult<PaymentIntent> {
        let Some(secret_key) = &self.secret_key else {
            return Ok(PaymentIntent {
                id: format!("{}{}", DEV_INTENT_PREFIX, Uuid::new_v4().simple()),
                client_secret: None,
                status: "succeeded".to_string(),
                amount: amount_cents,
                currency: currency.to_string(),
            });
        };

        let params = [
            ("amount", amount_cents.to_string()),
            ("currency", currency.to_string()),
            ("metadata[order_reference]", reference.to_string()),
        ];

        let response = self
            .http
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::payment(format!("Intent creation request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::payment(format!(
                "Intent creation returned {}: {}",
                status, body
            )));
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| AppError::payment(format!("Invalid intent payload: {}", e)))
    }

    async fn fetch_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        if intent_id.starts_with(DEV_INTENT_PREFIX) {
            return Ok(PaymentIntent {
                id: intent_id.to_string(),
                client_secret: None,
                status: "succeeded".to_string(),
                amount: 0,
                currency: String::new(),
            });
        }

        let secret_key = self
            .secret_key
            .as_ref()
            .ok_or_else(|| AppError::payment("Payment provider is not configured"))?;

        let response = self
            .http
            .get(format!("{}/v1/payment_intents/{}", self.base_url, intent_id))
            .bearer_auth(secret_key)
            .send()
            .await
            .map_err(|e| AppError::payment(format!("Intent fetch request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::payment(format!(
                "Intent fetch returned {}: {}",
                status, body
            )));
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| AppError::payment(format!("Invalid intent payload: {}", e)))
    }
}
