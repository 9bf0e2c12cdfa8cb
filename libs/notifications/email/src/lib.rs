//! Outbound email for RentEase
//!
//! - **Models**: [`Email`]
//! - **Providers**: [`SmtpProvider`] (lettre) and [`MockSmtpProvider`] behind [`EmailProvider`]
//! - **Delivery**: [`Notifier`], which never fails its caller and returns a [`DeliveryReport`]
//!
//! ```ignore
//! use email::{Notifier, SmtpProvider};
//!
//! let notifier = Notifier::new(Arc::new(SmtpProvider::from_env()?));
//! let _ = notifier.send("renter@example.com", "Welcome to RentEase!", "<p>Hi</p>").await;
//! ```

pub mod error;
pub mod models;
pub mod notifier;
pub mod provider;

pub use error::{NotificationError, NotificationResult};
pub use models::Email;
pub use notifier::{DeliveryReport, Notifier};
pub use provider::{
    EmailProvider, MockSmtpProvider, SendResult, SmtpConfig, SmtpProvider, SmtpSecurity,
};
