//! Mock email provider for testing

use super::{EmailProvider, SendResult};
use crate::models::Email;
use async_trait::async_trait;
use eyre::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Captures sent emails instead of delivering them.
///
/// Clones share the same outbox, so a test can hand one clone to the code
/// under test and inspect the other.
#[derive(Clone, Default)]
pub struct MockSmtpProvider {
    sent_emails: Arc<Mutex<Vec<Email>>>,
    send_failure: Option<String>,
    unreachable: bool,
}

impl MockSmtpProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider whose `send` always fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            send_failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Provider whose health check fails, as if the relay were down.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub async fn sent_emails(&self) -> Vec<Email> {
        self.sent_emails.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent_emails.lock().await.len()
    }

    pub async fn was_sent_to(&self, email: &str) -> bool {
        self.sent_emails
            .lock()
            .await
            .iter()
            .any(|e| e.to == email)
    }
}

#[async_trait]
impl EmailProvider for MockSmtpProvider {
    async fn send(&self, email: &Email) -> Result<SendResult> {
        if let Some(message) = &self.send_failure {
            return Err(eyre::eyre!(message.clone()));
        }

        self.sent_emails.lock().await.push(email.clone());

        Ok(SendResult {
            message_id: format!("mock-{}", email.id),
        })
    }

    async fn health_check(&self) -> Result<()> {
        if self.unreachable {
            return Err(eyre::eyre!("Mock SMTP server unreachable"));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
