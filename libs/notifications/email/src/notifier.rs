//! Best-effort email delivery.
//!
//! Callers on a request path should never fail because mail is down, so the
//! [`Notifier`] reports the outcome instead of returning an error.

use crate::error::NotificationResult;
use crate::models::Email;
use crate::provider::{EmailProvider, SmtpConfig, SmtpProvider};
use core_config::FromEnv;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Outcome of a best-effort send
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "ignore with `let _ =` when the outcome does not matter"]
pub enum DeliveryReport {
    Sent { message_id: String },
    Failed { reason: String },
}

impl DeliveryReport {
    pub fn is_sent(&self) -> bool {
        matches!(self, DeliveryReport::Sent { .. })
    }
}

#[derive(Clone)]
pub struct Notifier {
    provider: Arc<dyn EmailProvider>,
}

impl Notifier {
    pub fn new(provider: Arc<dyn EmailProvider>) -> Self {
        Self { provider }
    }

    /// Notifier over an SMTP transport built from `config`.
    pub fn smtp(config: SmtpConfig) -> NotificationResult<Self> {
        let provider = SmtpProvider::new(config)?;
        info!(
            host = %provider.config().host,
            port = provider.config().port,
            security = ?provider.config().security,
            "SMTP transport configured"
        );
        Ok(Self::new(Arc::new(provider)))
    }

    /// [`smtp`](Self::smtp) with [`SmtpConfig`] read from the environment.
    pub fn smtp_from_env() -> NotificationResult<Self> {
        Self::smtp(SmtpConfig::from_env()?)
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Send an HTML email to `to`. See [`send_best_effort`](Self::send_best_effort).
    pub async fn send(&self, to: &str, subject: &str, html_body: &str) -> DeliveryReport {
        self.send_best_effort(Email::new(to, subject).with_html(html_body))
            .await
    }

    /// Verify the transport, then send. Every failure is logged and reported,
    /// never returned.
    #[instrument(skip(self, email), fields(email_id = %email.id, to = %email.to, provider = self.provider.name()))]
    pub async fn send_best_effort(&self, email: Email) -> DeliveryReport {
        if let Err(e) = self.provider.health_check().await {
            error!("Email transport unavailable: {:#}", e);
            return DeliveryReport::Failed {
                reason: format!("{:#}", e),
            };
        }

        match self.provider.send(&email).await {
            Ok(result) => {
                info!(message_id = %result.message_id, subject = %email.subject, "Email sent");
                DeliveryReport::Sent {
                    message_id: result.message_id,
                }
            }
            Err(e) => {
                warn!("Email delivery failed: {:#}", e);
                DeliveryReport::Failed {
                    reason: format!("{:#}", e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockSmtpProvider;

    #[tokio::test]
    async fn test_send_records_html_email() {
        let mock = MockSmtpProvider::new();
        let notifier = Notifier::new(Arc::new(mock.clone()));

        let report = notifier
            .send("renter@example.com", "Welcome to RentEase!", "Hope you will find your apartment")
            .await;

        assert!(report.is_sent());
        let sent = mock.sent_emails().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "Welcome to RentEase!");
        assert_eq!(
            sent[0].body_html.as_deref(),
            Some("Hope you will find your apartment")
        );
    }

    #[tokio::test]
    async fn test_send_failure_is_reported_not_raised() {
        let notifier = Notifier::new(Arc::new(MockSmtpProvider::failing("535 bad credentials")));

        let report = notifier.send("renter@example.com", "Hi", "Hi").await;

        match report {
            DeliveryReport::Failed { reason } => assert!(reason.contains("535 bad credentials")),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_smtp_rejects_bad_sender() {
        let config = SmtpConfig {
            host: "localhost".to_string(),
            port: 1025,
            username: String::new(),
            password: String::new(),
            from_email: "not-an-address".to_string(),
            from_name: "RentEase".to_string(),
            security: crate::provider::SmtpSecurity::Plain,
        };

        let err = Notifier::smtp(config).err().unwrap();
        assert!(matches!(err, crate::NotificationError::ProviderError(_)));
    }

    #[tokio::test]
    async fn test_unreachable_transport_skips_send() {
        let mock = MockSmtpProvider::unreachable();
        let notifier = Notifier::new(Arc::new(mock.clone()));

        let report = notifier.send("renter@example.com", "Hi", "Hi").await;

        assert!(!report.is_sent());
        assert_eq!(mock.sent_count().await, 0);
    }
}
