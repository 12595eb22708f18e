//! Configuration loading and representation.
//!
//! Everything is read from environment variables:
//!
//! - `BIND_ADDR` (default `0.0.0.0:8080`)
//! - `USE_PERSISTENT_STORES` (default `false`; `true` selects Postgres)
//! - `DATABASE_URL` (required with persistent stores)
//! - `DATABASE_MAX_CONNECTIONS` (default `5`)

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not valid: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("{0} must be set when USE_PERSISTENT_STORES=true")]
    Missing(&'static str),
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                var: "BIND_ADDR",
                reason: e.to_string(),
            })?;

        let use_persistent = match lookup("USE_PERSISTENT_STORES") {
            None => false,
            Some(v) => v.trim().parse::<bool>().map_err(|e| ConfigError::Invalid {
                var: "USE_PERSISTENT_STORES",
                reason: e.to_string(),
            })?,
        };

        let storage = if use_persistent {
            let database_url = lookup("DATABASE_URL")
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing("DATABASE_URL"))?;
            let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
                None => DEFAULT_MAX_CONNECTIONS,
                Some(v) => v.trim().parse::<u32>().map_err(|e| ConfigError::Invalid {
                    var: "DATABASE_MAX_CONNECTIONS",
                    reason: e.to_string(),
                })?,
            };
            StorageConfig::Postgres {
                database_url,
                max_connections,
            }
        } else {
            StorageConfig::InMemory
        };

        Ok(Self { bind_addr, storage })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            storage: StorageConfig::InMemory,
        }
    }
}
