//! SMTP email provider using lettre

use super::{EmailProvider, SendResult};
use crate::models::Email;
use async_trait::async_trait;
use core_config::{ConfigError, FromEnv, env_first, env_or_default, env_parse_or};
use eyre::{Result, WrapErr};
use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, SinglePart, header::ContentType},
    transport::smtp::authentication::Credentials,
};
use std::str::FromStr;
use std::sync::Arc;

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_FROM_NAME: &str = "RentEase";

/// How the connection to the relay is secured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (submission port 587)
    StartTls,
    /// TLS from the first byte (port 465)
    Tls,
    /// No TLS, no auth unless credentials are set (Mailpit/Mailhog)
    Plain,
}

impl SmtpSecurity {
    /// Security implied by a port when none is configured.
    pub fn for_port(port: u16) -> Self {
        match port {
            587 => Self::StartTls,
            1025 => Self::Plain,
            _ => Self::Tls,
        }
    }
}

impl FromStr for SmtpSecurity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "starttls" => Ok(Self::StartTls),
            "tls" | "ssl" => Ok(Self::Tls),
            "plain" | "none" => Ok(Self::Plain),
            other => Err(format!("expected starttls, tls or plain, got '{other}'")),
        }
    }
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
    pub security: SmtpSecurity,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .field("from_email", &self.from_email)
            .field("from_name", &self.from_name)
            .field("security", &self.security)
            .finish()
    }
}

/// Environment variables:
/// - `SMTP_HOST` (default `smtp.gmail.com`), `SMTP_PORT` (default 587)
/// - `SMTP_USERNAME` / `SMTP_PASSWORD`, falling back to `TRANSPORTER_EMAIL` / `TRANSPORTER_PASS`
/// - `SMTP_SECURITY`: `starttls`, `tls` or `plain` (default from the port)
/// - `EMAIL_FROM_ADDRESS` (default: the username), `EMAIL_FROM_NAME` (default `RentEase`)
impl FromEnv for SmtpConfig {
    fn from_env() -> std::result::Result<Self, ConfigError> {
        let port = env_parse_or("SMTP_PORT", DEFAULT_SMTP_PORT)?;
        let username = env_first(&["SMTP_USERNAME", "TRANSPORTER_EMAIL"]).unwrap_or_default();
        let password = env_first(&["SMTP_PASSWORD", "TRANSPORTER_PASS"]).unwrap_or_default();

        let from_email = match env_first(&["EMAIL_FROM_ADDRESS"]) {
            Some(from) => from,
            None if !username.is_empty() => username.clone(),
            None => {
                return Err(ConfigError::MissingEnvVar(
                    "EMAIL_FROM_ADDRESS (or SMTP_USERNAME)".to_string(),
                ));
            }
        };

        Ok(Self {
            host: env_or_default("SMTP_HOST", DEFAULT_SMTP_HOST),
            port,
            username,
            password,
            from_email,
            from_name: env_or_default("EMAIL_FROM_NAME", DEFAULT_FROM_NAME),
            security: env_parse_or("SMTP_SECURITY", SmtpSecurity::for_port(port))?,
        })
    }
}

pub struct SmtpProvider {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    config: Arc<SmtpConfig>,
}

impl SmtpProvider {
    pub fn new(config: SmtpConfig) -> Result<Self> {
        let credentials = (!config.username.is_empty())
            .then(|| Credentials::new(config.username.clone(), config.password.clone()));

        let builder = match config.security {
            SmtpSecurity::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                .wrap_err("Failed to create STARTTLS SMTP relay")?,
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                .wrap_err("Failed to create TLS SMTP relay")?,
            SmtpSecurity::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host),
        };

        let builder = builder.port(config.port);
        let transport = match credentials {
            Some(creds) => builder.credentials(creds).build(),
            None => builder.build(),
        };

        let address: Address = config
            .from_email
            .parse()
            .wrap_err_with(|| format!("Invalid from address '{}'", config.from_email))?;
        let from = Mailbox::new(Some(config.from_name.clone()), address);

        Ok(Self {
            transport,
            from,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &SmtpConfig {
        &self.config
    }

    fn build_message(&self, email: &Email) -> Result<Message> {
        let to: Mailbox = email
            .to
            .parse()
            .wrap_err_with(|| format!("Invalid to address '{}'", email.to))?;

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(&email.subject);

        if let Some(reply_to) = &email.reply_to {
            let reply_to: Mailbox = reply_to.parse().wrap_err("Invalid reply-to address")?;
            builder = builder.reply_to(reply_to);
        }

        let message = match (&email.body_text, &email.body_html) {
            (Some(text), Some(html)) => builder
                .multipart(MultiPart::alternative_plain_html(text.clone(), html.clone()))
                .wrap_err("Failed to build multipart message")?,
            (Some(text), None) => builder
                .singlepart(SinglePart::plain(text.clone()))
                .wrap_err("Failed to build text message")?,
            (None, Some(html)) => builder
                .header(ContentType::TEXT_HTML)
                .body(html.clone())
                .wrap_err("Failed to build HTML message")?,
            (None, None) => {
                return Err(eyre::eyre!("Email must have either text or HTML body"));
            }
        };

        Ok(message)
    }
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &Email) -> Result<SendResult> {
        let message = self.build_message(email)?;

        let response = self
            .transport
            .send(message)
            .await
            .wrap_err("Failed to send email via SMTP")?;

        let message_id = response
            .message()
            .next()
            .map(|s| s.to_string())
            .unwrap_or_else(|| email.id.clone());

        Ok(SendResult { message_id })
    }

    async fn health_check(&self) -> Result<()> {
        let reachable = self
            .transport
            .test_connection()
            .await
            .wrap_err_with(|| format!("SMTP health check failed for {}", self.config.host))?;

        if !reachable {
            return Err(eyre::eyre!(
                "SMTP server {}:{} did not accept the connection",
                self.config.host,
                self.config.port
            ));
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(security: SmtpSecurity) -> SmtpConfig {
        SmtpConfig {
            host: "localhost".to_string(),
            port: 1025,
            username: String::new(),
            password: String::new(),
            from_email: "rentease@example.com".to_string(),
            from_name: DEFAULT_FROM_NAME.to_string(),
            security,
        }
    }

    #[test]
    fn test_security_for_port() {
        assert_eq!(SmtpSecurity::for_port(587), SmtpSecurity::StartTls);
        assert_eq!(SmtpSecurity::for_port(465), SmtpSecurity::Tls);
        assert_eq!(SmtpSecurity::for_port(1025), SmtpSecurity::Plain);
    }

    #[test]
    fn test_security_from_str() {
        assert_eq!("STARTTLS".parse::<SmtpSecurity>(), Ok(SmtpSecurity::StartTls));
        assert_eq!("ssl".parse::<SmtpSecurity>(), Ok(SmtpSecurity::Tls));
        assert!("carrier-pigeon".parse::<SmtpSecurity>().is_err());
    }

    #[tokio::test]
    async fn test_build_html_message() {
        let provider = SmtpProvider::new(config(SmtpSecurity::Plain)).unwrap();
        let email = Email::new("renter@example.com", "Welcome to RentEase!")
            .with_html("Hope you will find your apartment");

        let message = provider.build_message(&email).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("From: RentEase <rentease@example.com>") || raw.contains("From: \"RentEase\" <rentease@example.com>"));
        assert!(raw.contains("renter@example.com"));
        assert!(raw.contains("Subject: Welcome to RentEase!"));
        assert!(raw.contains("Content-Type: text/html"));
    }

    #[tokio::test]
    async fn test_build_message_requires_body() {
        let provider = SmtpProvider::new(config(SmtpSecurity::Plain)).unwrap();
        let email = Email::new("renter@example.com", "Empty");
        assert!(provider.build_message(&email).is_err());
    }

    #[tokio::test]
    async fn test_build_message_rejects_bad_recipient() {
        let provider = SmtpProvider::new(config(SmtpSecurity::Plain)).unwrap();
        let email = Email::new("not an address", "Hi").with_text("Hi");
        assert!(provider.build_message(&email).is_err());
    }

    #[tokio::test]
    async fn test_invalid_from_address() {
        let mut cfg = config(SmtpSecurity::Plain);
        cfg.from_email = "nope".to_string();
        assert!(SmtpProvider::new(cfg).is_err());
    }

    #[test]
    fn test_config_from_env_falls_back_to_transporter_vars() {
        temp_env::with_vars(
            [
                ("SMTP_HOST", None::<&str>),
                ("SMTP_PORT", None),
                ("SMTP_SECURITY", None),
                ("SMTP_USERNAME", None),
                ("SMTP_PASSWORD", None),
                ("TRANSPORTER_EMAIL", Some("rentease@gmail.com")),
                ("TRANSPORTER_PASS", Some("app-password")),
                ("EMAIL_FROM_ADDRESS", None),
                ("EMAIL_FROM_NAME", None),
            ],
            || {
                let config = SmtpConfig::from_env().unwrap();
                assert_eq!(config.host, "smtp.gmail.com");
                assert_eq!(config.port, 587);
                assert_eq!(config.security, SmtpSecurity::StartTls);
                assert_eq!(config.username, "rentease@gmail.com");
                assert_eq!(config.password, "app-password");
                assert_eq!(config.from_email, "rentease@gmail.com");
                assert_eq!(config.from_name, "RentEase");
            },
        );
    }

    #[test]
    fn test_config_from_env_mailpit() {
        temp_env::with_vars(
            [
                ("SMTP_HOST", Some("localhost")),
                ("SMTP_PORT", Some("1025")),
                ("SMTP_SECURITY", None),
                ("SMTP_USERNAME", None),
                ("TRANSPORTER_EMAIL", None),
                ("EMAIL_FROM_ADDRESS", Some("dev@localhost.test")),
            ],
            || {
                let config = SmtpConfig::from_env().unwrap();
                assert_eq!(config.security, SmtpSecurity::Plain);
                assert!(config.username.is_empty());
                assert_eq!(config.from_email, "dev@localhost.test");
            },
        );
    }

    #[test]
    fn test_config_from_env_requires_sender() {
        temp_env::with_vars(
            [
                ("SMTP_USERNAME", None::<&str>),
                ("TRANSPORTER_EMAIL", None),
                ("EMAIL_FROM_ADDRESS", None),
            ],
            || {
                assert!(matches!(
                    SmtpConfig::from_env(),
                    Err(ConfigError::MissingEnvVar(_))
                ));
            },
        );
    }

    #[test]
    fn test_config_debug_hides_password() {
        let mut cfg = config(SmtpSecurity::StartTls);
        cfg.password = "hunter2".to_string();
        assert!(!format!("{:?}", cfg).contains("hunter2"));
    }
}
