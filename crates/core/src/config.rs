use std::env;
use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::slot::Slot;
use crate::scheduler::DEFAULT_SLOT_CAPACITY;

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub delivery: DeliveryConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeliveryConfig {
    pub window_start: String,
    pub window_end: String,
    pub slot_capacity: u8,
}

impl DeliveryConfig {
    pub fn window(&self) -> Result<(Slot, Slot), ConfigError> {
        let parse = |value: &str| {
            value.parse::<Slot>().map_err(|_| ConfigError::Validation(format!(
                "delivery window bound `{value}` is not an HH:MM quarter-hour"
            )))
        };
        let start = parse(&self.window_start)?;
        let end = parse(&self.window_end)?;
        if start > end {
            return Err(ConfigError::Validation(format!(
                "delivery window start {start} is after end {end}"
            )));
        }
        Ok((start, end))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    database: RawDatabase,
    #[serde(default)]
    server: RawServer,
    #[serde(default)]
    delivery: RawDelivery,
    #[serde(default)]
    logging: RawLogging,
}

#[derive(Debug, Default, Deserialize)]
struct RawDatabase {
    url: Option<String>,
    max_connections: Option<u32>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawServer {
    bind_address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDelivery {
    window_start: Option<String>,
    window_end: Option<String>,
    slot_capacity: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
struct RawLogging {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl AppConfig {
    /// Loads configuration from an optional TOML file, then applies
    /// `PRONTO_*` environment overrides, then validates.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let raw = match &options.config_path {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(path)
                    .map_err(|source| ConfigError::ReadFile { path: path.clone(), source })?;
                toml::from_str::<RawConfig>(&content)
                    .map_err(|source| ConfigError::ParseFile { path: path.clone(), source })?
            }
            Some(path) if options.require_file => {
                return Err(ConfigError::MissingConfigFile(path.clone()));
            }
            _ => RawConfig::default(),
        };

        let mut config = Self {
            database: DatabaseConfig {
                url: raw.database.url.unwrap_or_else(|| "sqlite:pronto.db".to_owned()),
                max_connections: raw.database.max_connections.unwrap_or(5),
                timeout_secs: raw.database.timeout_secs.unwrap_or(30),
            },
            server: ServerConfig {
                bind_address: raw.server.bind_address.unwrap_or_else(|| "127.0.0.1".to_owned()),
                port: raw.server.port.unwrap_or(5000),
            },
            delivery: DeliveryConfig {
                window_start: raw.delivery.window_start.unwrap_or_else(|| "19:00".to_owned()),
                window_end: raw.delivery.window_end.unwrap_or_else(|| "23:00".to_owned()),
                slot_capacity: raw.delivery.slot_capacity.unwrap_or(DEFAULT_SLOT_CAPACITY),
            },
            logging: LoggingConfig {
                level: raw.logging.level.unwrap_or_else(|| "info".to_owned()),
                format: raw.logging.format.unwrap_or(LogFormat::Compact),
            },
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(url) = env::var("PRONTO_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(address) = env::var("PRONTO_BIND_ADDRESS") {
            self.server.bind_address = address;
        }
        if let Ok(port) = env::var("PRONTO_PORT") {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                key: "PRONTO_PORT".to_owned(),
                value: port,
            })?;
        }
        if let Ok(capacity) = env::var("PRONTO_SLOT_CAPACITY") {
            self.delivery.slot_capacity =
                capacity.parse().map_err(|_| ConfigError::InvalidEnvOverride {
                    key: "PRONTO_SLOT_CAPACITY".to_owned(),
                    value: capacity,
                })?;
        }
        if let Ok(level) = env::var("PRONTO_LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_empty() {
            return Err(ConfigError::Validation("database url must not be empty".to_owned()));
        }
        if self.delivery.slot_capacity == 0 {
            return Err(ConfigError::Validation("slot capacity must be at least 1".to_owned()));
        }
        self.delivery.window()?;
        Ok(())
    }
}
