//! Payment intents for RentEase
//!
//! - **Models**: [`RentAmount`], [`PaymentIntentRequest`], [`PaymentIntent`]
//! - **Providers**: [`StripeProvider`] (reqwest) and [`MockPaymentProvider`] behind [`PaymentProvider`]
//! - **Service**: [`PaymentService`], which validates the rent and returns the client secret
//!
//! ```ignore
//! use payments::{PaymentService, StripeProvider};
//!
//! let payments = PaymentService::new(Arc::new(StripeProvider::from_env()?));
//! let secret = payments.create_intent(&serde_json::json!(25)).await?;
//! ```

pub mod error;
pub mod models;
pub mod provider;
pub mod service;

pub use error::{PaymentError, PaymentResult};
pub use models::{CURRENCY, PaymentIntent, PaymentIntentRequest, RentAmount};
pub use provider::{MockPaymentProvider, PaymentProvider, StripeConfig, StripeProvider};
pub use service::PaymentService;
