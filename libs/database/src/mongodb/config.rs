#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_first, env_parse_or};

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "rentease";

/// MongoDB connection settings
///
/// Built by hand in tests, or from the process environment with the `config`
/// feature.
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "rentease");
/// let config = MongoConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Connection string, `mongodb://` or `mongodb+srv://`
    pub url: String,
    pub database: String,
    /// Reported to the server in its connection logs
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
    /// Pin the Stable API to version 1 (Atlas clusters)
    pub server_api_v1: bool,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_pool_size(mut self, max_pool_size: u32, min_pool_size: u32) -> Self {
        self.max_pool_size = max_pool_size;
        self.min_pool_size = min_pool_size;
        self
    }

    pub fn with_server_api_v1(mut self, enabled: bool) -> Self {
        self.server_api_v1 = enabled;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Connection string with any credentials replaced by `***`, for logging.
    pub fn redacted_url(&self) -> String {
        redact_credentials(&self.url)
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: DEFAULT_DATABASE.to_string(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
            server_api_v1: false,
        }
    }
}

/// Atlas SRV connection string for `user`/`pass` on `cluster`.
///
/// Credentials are percent-encoded so reserved characters in passwords
/// survive URI parsing.
pub fn atlas_url(user: &str, pass: &str, cluster: &str) -> String {
    format!(
        "mongodb+srv://{}:{}@{}/?retryWrites=true&w=majority&appName=Cluster0",
        urlencoding::encode(user),
        urlencoding::encode(pass),
        cluster
    )
}

fn redact_credentials(url: &str) -> String {
    let Some((scheme, rest)) = url.split_once("://") else {
        return url.to_string();
    };
    match rest.rsplit_once('@') {
        Some((_, host)) => format!("{scheme}://***@{host}"),
        None => url.to_string(),
    }
}

/// Environment variables:
/// - `MONGODB_URL` or `MONGO_URL`: full connection string
/// - otherwise `DB_USER`, `DB_PASS` and `DB_CLUSTER` compose an Atlas SRV URL
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (default `rentease`)
/// - `MONGODB_APP_NAME`
/// - `MONGODB_MAX_POOL_SIZE` (100), `MONGODB_MIN_POOL_SIZE` (5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (10), `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (30)
/// - `MONGODB_SERVER_API_V1` (defaults to on for composed Atlas URLs)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let (url, composed) = match env_first(&["MONGODB_URL", "MONGO_URL"]) {
            Some(url) => (url, false),
            None => {
                let parts = (
                    std::env::var("DB_USER"),
                    std::env::var("DB_PASS"),
                    std::env::var("DB_CLUSTER"),
                );
                match parts {
                    (Ok(user), Ok(pass), Ok(cluster)) => (atlas_url(&user, &pass, &cluster), true),
                    _ => {
                        return Err(ConfigError::MissingEnvVar(
                            "MONGODB_URL (or DB_USER, DB_PASS and DB_CLUSTER)".to_string(),
                        ));
                    }
                }
            }
        };

        let database = env_first(&["MONGODB_DATABASE", "MONGO_DATABASE"])
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        Ok(Self {
            url,
            database,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size: env_parse_or("MONGODB_MAX_POOL_SIZE", 100)?,
            min_pool_size: env_parse_or("MONGODB_MIN_POOL_SIZE", 5)?,
            connect_timeout_secs: env_parse_or("MONGODB_CONNECT_TIMEOUT_SECS", 10)?,
            server_selection_timeout_secs: env_parse_or(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                30,
            )?,
            server_api_v1: env_parse_or("MONGODB_SERVER_API_V1", composed)?,
        })
    }
}
