//! Configuration for RentEase API

use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::mongodb::MongoConfig;
use email::SmtpConfig;
use payments::StripeConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub stripe: StripeConfig,
    pub smtp: SmtpConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self {
            app: app_info!(),
            mongodb: MongoConfig::from_env()?,
            server: ServerConfig::from_env()?,
            stripe: StripeConfig::from_env()?,
            smtp: SmtpConfig::from_env()?,
            environment: Environment::from_env(),
        })
    }
}
