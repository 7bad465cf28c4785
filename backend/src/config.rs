use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_CORS_ORIGIN_PREFIX: &str = "http://localhost";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ConfigError::UnknownStore(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown POLL_STORE value {0:?} (expected \"postgres\" or \"memory\")")]
    UnknownStore(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub cors_origin_prefix: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::default(),
            cors_origin_prefix: DEFAULT_CORS_ORIGIN_PREFIX.to_string(),
        }
    }
}

impl AppConfig {
    /// Builds the config from a key lookup, normally the deployment's
    /// secret store. Missing or blank keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let store: StoreBackend = get("POLL_STORE")
            .map(|v| v.parse())
            .transpose()?
            .unwrap_or_default();
        let cors_origin_prefix = get("CORS_ORIGIN_PREFIX")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN_PREFIX.to_string());

        Ok(Self { store, cors_origin_prefix })
    }
}
