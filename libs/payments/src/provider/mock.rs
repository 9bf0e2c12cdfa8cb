//! Mock payment provider for testing

use super::PaymentProvider;
use crate::models::{PaymentIntent, PaymentIntentRequest};
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Records requested intents and hands out fake client secrets.
///
/// Clones share the same ledger.
#[derive(Clone, Default)]
pub struct MockPaymentProvider {
    requests: Arc<Mutex<Vec<PaymentIntentRequest>>>,
    failure: Option<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose `create_intent` always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub async fn requests(&self) -> Vec<PaymentIntentRequest> {
        self.requests.lock().await.clone()
    }

    /// Requested amounts in minor units, oldest first.
    pub async fn amounts(&self) -> Vec<i64> {
        self.requests.lock().await.iter().map(|r| r.amount).collect()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_intent(&self, request: &PaymentIntentRequest) -> Result<PaymentIntent> {
        if let Some(message) = &self.failure {
            return Err(eyre::eyre!(message.clone()));
        }

        self.requests.lock().await.push(request.clone());

        let id = format!("pi_mock_{}", Uuid::new_v4().simple());
        Ok(PaymentIntent {
            client_secret: format!("{id}_secret_mock"),
            id,
            status: Some("requires_payment_method".to_string()),
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
