use crate::error::AppError;
use config::builder::DefaultState;
use config::{Config as Cfg, ConfigBuilder, Environment, File};
use serde::Deserialize;

/// Settings every service shares: listen port and logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Layered configuration sources shared by all services.
///
/// Reads `.env` into the process environment, then stacks an optional
/// `configuration.{toml,yaml,json}` file under `APP__`-prefixed variables
/// (`APP__DATABASE__URL` maps to `database.url`). Callers may add defaults
/// and overrides before building.
pub fn source_builder() -> ConfigBuilder<DefaultState> {
    dotenvy::dotenv().ok();

    Cfg::builder()
        .add_source(File::with_name("configuration").required(false))
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
}

impl Config {
    pub fn load() -> Result<Self, AppError> {
        let config = source_builder().build()?;

        Ok(config.try_deserialize()?)
    }
}
