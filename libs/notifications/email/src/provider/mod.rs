//! Email provider implementations

pub mod mock;
pub mod smtp;

pub use mock::MockSmtpProvider;
pub use smtp::{SmtpConfig, SmtpProvider, SmtpSecurity};

use crate::models::Email;
use async_trait::async_trait;
use eyre::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResult {
    /// Provider-assigned id, or the local email id when none is reported
    pub message_id: String,
}

/// Trait for email transports
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, email: &Email) -> Result<SendResult>;

    /// Verify the transport can reach and authenticate with its server.
    async fn health_check(&self) -> Result<()>;

    fn name(&self) -> &'static str;
}
