use mongodb::{
    Client,
    bson::doc,
    error::ErrorKind,
    options::{ClientOptions, ServerApi, ServerApiVersion},
};
use std::time::Duration;
use tracing::{info, instrument};

use super::MongoConfig;
use crate::common::{RetryConfig, retry_if};

/// Error type for MongoDB connection management
#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

impl MongoError {
    /// Whether another connection attempt could succeed.
    ///
    /// Malformed connection strings and rejected credentials will not fix
    /// themselves between attempts.
    pub fn is_transient(&self) -> bool {
        match self {
            MongoError::Mongo(e) => !matches!(
                *e.kind,
                ErrorKind::InvalidArgument { .. } | ErrorKind::Authentication { .. }
            ),
            MongoError::ConnectionFailed(_) => true,
        }
    }
}

async fn client_options(config: &MongoConfig) -> Result<ClientOptions, MongoError> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));

    if let Some(ref app_name) = config.app_name {
        options.app_name = Some(app_name.clone());
    }

    if config.server_api_v1 {
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    }

    Ok(options)
}

/// Connect with `config` and confirm the deployment answers a ping.
///
/// ```ignore
/// use database::mongodb::{MongoConfig, connect_from_config};
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "rentease");
/// let client = connect_from_config(&config).await?;
/// ```
#[instrument(skip(config), fields(url = %config.redacted_url(), database = %config.database))]
pub async fn connect_from_config(config: &MongoConfig) -> Result<Client, MongoError> {
    info!("Attempting to connect to MongoDB");

    let client = Client::with_options(client_options(config).await?)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;

    info!("Successfully connected to MongoDB");
    Ok(client)
}

/// [`connect_from_config`] with exponential backoff on transient failures.
///
/// ```ignore
/// use database::common::RetryConfig;
///
/// let retry = RetryConfig::new().with_max_retries(5).with_initial_delay(500);
/// let client = connect_from_config_with_retry(&config, Some(retry)).await?;
/// ```
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> Result<Client, MongoError> {
    retry_if(
        || connect_from_config(config),
        MongoError::is_transient,
        retry_config.unwrap_or_default(),
    )
    .await
}

/// Close every pooled connection and end outstanding sessions.
///
/// Waits for operations still holding a connection to finish, so callers
/// should bound it with a timeout during shutdown.
pub async fn disconnect(client: Client) {
    info!("Closing MongoDB connections");
    client.shutdown().await;
    info!("MongoDB connections closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_permanent() {
        let err = connect_from_config(&MongoConfig::new("not-a-mongo-url"))
            .await
            .unwrap_err();
        assert!(!err.is_transient());
    }

    #[test]
    fn test_connection_failed_is_transient() {
        assert!(MongoError::ConnectionFailed("timed out".into()).is_transient());
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_connect_from_config() {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = connect_from_config(&MongoConfig::with_database(url, "test"))
            .await
            .unwrap();
        disconnect(client).await;
    }
}
