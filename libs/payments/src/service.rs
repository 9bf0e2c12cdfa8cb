//! Rent payment intents.

use crate::error::PaymentResult;
use crate::models::{PaymentIntentRequest, RentAmount};
use crate::provider::PaymentProvider;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument};

#[derive(Clone)]
pub struct PaymentService {
    provider: Arc<dyn PaymentProvider>,
}

impl PaymentService {
    pub fn new(provider: Arc<dyn PaymentProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Validate `rent` (major units), create a card intent in USD and return
    /// its client secret.
    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn create_intent(&self, rent: &Value) -> PaymentResult<String> {
        let amount = RentAmount::from_json(rent)?;
        let request = PaymentIntentRequest::card(amount);

        let intent = self.provider.create_intent(&request).await?;

        info!(intent_id = %intent.id, amount = request.amount, "Payment intent created");
        Ok(intent.client_secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PaymentError;
    use crate::provider::MockPaymentProvider;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_intent_returns_client_secret() {
        let provider = MockPaymentProvider::new();
        let service = PaymentService::new(Arc::new(provider.clone()));

        let secret = service.create_intent(&json!(25)).await.unwrap();

        assert!(!secret.is_empty());
        assert_eq!(provider.amounts().await, vec![2500]);
        let request = &provider.requests().await[0];
        assert_eq!(request.currency, "usd");
        assert_eq!(request.payment_method_types, vec!["card".to_string()]);
    }

    #[tokio::test]
    async fn test_invalid_rent_never_reaches_provider() {
        let provider = MockPaymentProvider::new();
        let service = PaymentService::new(Arc::new(provider.clone()));

        for rent in [json!(0), json!(-3), json!(0.001), json!(null)] {
            let err = service.create_intent(&rent).await.unwrap_err();
            assert!(matches!(err, PaymentError::InvalidAmount(_)), "{rent}");
        }
        assert!(provider.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_provider_failure_is_provider_error() {
        let service = PaymentService::new(Arc::new(MockPaymentProvider::failing("api down")));

        let err = service.create_intent(&json!("12.50")).await.unwrap_err();

        match err {
            PaymentError::ProviderError(message) => assert!(message.contains("api down")),
            other => panic!("expected provider error, got {other:?}"),
        }
    }
}
