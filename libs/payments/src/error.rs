//! Error types for payment intents.

use thiserror::Error;

pub type PaymentResult<T> = Result<T, PaymentError>;

#[derive(Debug, Error)]
pub enum PaymentError {
    /// Rent missing, non-numeric, or below one cent
    #[error("Invalid rent amount: {0}")]
    InvalidAmount(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Provider rejected the request or could not be reached
    #[error("Provider error: {0}")]
    ProviderError(String),
}

impl From<eyre::Report> for PaymentError {
    fn from(err: eyre::Report) -> Self {
        Self::ProviderError(format!("{:#}", err))
    }
}

impl From<core_config::ConfigError> for PaymentError {
    fn from(err: core_config::ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
