use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: Secret<String>,
    #[serde(default = "default_database_name")]
    pub name: String,
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_app_name")]
    pub app_name: String,
}

fn default_database_name() -> String {
    "products".to_string()
}

fn default_collection() -> String {
    "products".to_string()
}

fn default_app_name() -> String {
    "product-service".to_string()
}

impl ProductConfig {
    /// Load from the shared layered sources. A bare `DATABASE_URL` (the
    /// variable existing `.env` files use) wins over `APP__DATABASE__URL`.
    pub fn load() -> Result<Self, AppError> {
        let config = core_config::source_builder()
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}
