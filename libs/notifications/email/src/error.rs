//! Error types for outbound email.

use thiserror::Error;

pub type NotificationResult<T> = Result<T, NotificationError>;

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Transport failure (connection, authentication, rejected message)
    #[error("Provider error: {0}")]
    ProviderError(String),
}

impl From<eyre::Report> for NotificationError {
    fn from(err: eyre::Report) -> Self {
        // `{:#}` keeps the wrap_err chain on one line
        Self::ProviderError(format!("{:#}", err))
    }
}

impl From<core_config::ConfigError> for NotificationError {
    fn from(err: core_config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
