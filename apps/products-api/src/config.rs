//! Configuration for Products API

use core_config::{app_info, env_or_default, server::ServerConfig, AppInfo, ConfigError, FromEnv};
use database::mongodb::MongoConfig;
use domain_products::mongodb::DEFAULT_COLLECTION;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    /// Collection holding the products, `MONGODB_COLLECTION`
    pub collection: String,
    pub server: ServerConfig,
    pub environment: Environment,
}

impl FromEnv for Config {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: app_info!(),
            mongodb: MongoConfig::from_env()?,
            collection: env_or_default("MONGODB_COLLECTION", DEFAULT_COLLECTION),
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
        })
    }
}
