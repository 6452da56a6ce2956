//! Configuration module for recipe-service.

use secrecy::{ExposeSecret, Secret};
use service_core::config as core_config;
use service_core::error::AppError;
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecipeConfig {
    pub common: core_config::Config,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub user: String,
    pub password: Secret<String>,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Upper bound on how long a request waits for a free pooled connection.
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .username(&self.user)
            .password(self.password.expose_secret())
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .ssl_mode(PgSslMode::Disable)
    }

    /// `host:port/dbname`, safe to log.
    pub fn display_target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.name)
    }
}

impl RecipeConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        Self::from_lookup(common, |key| env::var(key).ok())
    }

    /// Build the service configuration from `common` and a key lookup.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| AppError::ConfigError(anyhow::anyhow!("{} is required", key)))
        };

        let port = match lookup("DB_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|e| {
                AppError::ConfigError(anyhow::anyhow!("DB_PORT '{}' is not a valid port: {}", raw, e))
            })?,
            None => 5432,
        };

        let max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10u32)?;
        let min_connections = parse_or(&lookup, "DATABASE_MIN_CONNECTIONS", 1u32)?;
        let acquire_timeout_secs = parse_or(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", 5u64)?;

        if max_connections == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_MAX_CONNECTIONS must be at least 1"
            )));
        }
        if min_connections > max_connections {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_MIN_CONNECTIONS ({}) exceeds DATABASE_MAX_CONNECTIONS ({})",
                min_connections,
                max_connections
            )));
        }

        Ok(Self {
            common,
            service_name: lookup("SERVICE_NAME").unwrap_or_else(|| "recipe-service".to_string()),
            service_version: lookup("SERVICE_VERSION")
                .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            otlp_endpoint: lookup("OTLP_ENDPOINT").filter(|v| !v.is_empty()),
            database: DatabaseConfig {
                user: required("POSTGRES_USER")?,
                password: Secret::new(required("POSTGRES_PASSWORD")?),
                host: lookup("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
                port,
                name: required("POSTGRES_DB")?,
                max_connections,
                min_connections,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            },
        })
    }
}

/// Parse `key` when present, `default` otherwise. A present but malformed value is an error.
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} '{}' is invalid: {}", key, raw, e))
        }),
        None => Ok(default),
    }
}
