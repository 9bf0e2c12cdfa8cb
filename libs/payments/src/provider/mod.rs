//! Payment provider implementations

mod mock;
mod stripe;

pub use mock::MockPaymentProvider;
pub use stripe::{DEFAULT_STRIPE_API_BASE, StripeConfig, StripeProvider};

use crate::models::{PaymentIntent, PaymentIntentRequest};
use async_trait::async_trait;
use eyre::Result;

/// Trait for payment-intent providers
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create one single-use intent. Each call creates a distinct intent.
    async fn create_intent(&self, request: &PaymentIntentRequest) -> Result<PaymentIntent>;

    /// Get provider name
    fn name(&self) -> &'static str;
}
