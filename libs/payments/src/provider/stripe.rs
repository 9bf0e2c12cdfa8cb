//! Stripe provider implementation

use super::PaymentProvider;
use crate::models::{PaymentIntent, PaymentIntentRequest};
use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_or_default, env_required};
use eyre::{Result, WrapErr, eyre};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub api_base: String,
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("secret_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl StripeConfig {
    pub fn new(secret_key: impl Into<String>) -> Self {
        Self {
            secret_key: secret_key.into(),
            api_base: DEFAULT_STRIPE_API_BASE.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn payment_intents_url(&self) -> String {
        format!("{}/v1/payment_intents", self.api_base.trim_end_matches('/'))
    }
}

impl FromEnv for StripeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret_key: env_required("STRIPE_SECRET_KEY")?,
            api_base: env_or_default("STRIPE_API_BASE", DEFAULT_STRIPE_API_BASE),
        })
    }
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

/// Human-readable failure for a non-2xx Stripe response.
fn describe_failure(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<StripeErrorBody>(body)
        .ok()
        .map(|b| match (b.error.kind, b.error.message) {
            (Some(kind), Some(message)) => format!("{kind}: {message}"),
            (None, Some(message)) => message,
            (Some(kind), None) => kind,
            (None, None) => body.to_string(),
        })
        .unwrap_or_else(|| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED => format!("Stripe authentication failed: {detail}"),
        StatusCode::TOO_MANY_REQUESTS => format!("Stripe rate limit exceeded: {detail}"),
        s if s.is_client_error() => format!("Stripe rejected the request ({s}): {detail}"),
        s => format!("Stripe API error ({s}): {detail}"),
    }
}

pub struct StripeProvider {
    client: Client,
    config: StripeConfig,
}

impl StripeProvider {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(StripeConfig::from_env()?))
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }
}

#[async_trait]
impl PaymentProvider for StripeProvider {
    #[instrument(skip(self, request), fields(amount = request.amount, currency = %request.currency))]
    async fn create_intent(&self, request: &PaymentIntentRequest) -> Result<PaymentIntent> {
        let response = self
            .client
            .post(self.config.payment_intents_url())
            .bearer_auth(&self.config.secret_key)
            .form(&request.form_params())
            .send()
            .await
            .wrap_err("Failed to reach Stripe")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(eyre!(describe_failure(status, &body)));
        }

        let intent: PaymentIntent = response
            .json()
            .await
            .wrap_err("Failed to decode Stripe payment intent")?;

        debug!(intent_id = %intent.id, "Payment intent created");
        Ok(intent)
    }

    fn name(&self) -> &'static str {
        "stripe"
    }
}
