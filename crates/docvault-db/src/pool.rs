//! PostgreSQL pool setup.
//!
//! Sizing and the acquire timeout come from `DB_*` environment variables;
//! everything else uses sqlx defaults.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{debug, info, warn};

use docvault_core::{Error, Result};

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 1;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// How many connections to keep and how long a request may wait for one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            min_connections: DEFAULT_MIN_CONNECTIONS,
            acquire_timeout: Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS),
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `DB_MAX_CONNECTIONS`, `DB_MIN_CONNECTIONS` and
    /// `DB_CONNECT_TIMEOUT_SECS`. Missing or unparsable values keep their
    /// defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`PoolConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |name: &str| lookup(name).and_then(|v| v.trim().parse::<u64>().ok());

        let config = Self {
            max_connections: number("DB_MAX_CONNECTIONS")
                .and_then(|n| u32::try_from(n).ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_connections),
            min_connections: number("DB_MIN_CONNECTIONS")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(defaults.min_connections),
            acquire_timeout: number("DB_CONNECT_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.acquire_timeout),
        };

        if config.min_connections > config.max_connections {
            warn!(
                subsystem = "db",
                component = "pool",
                min_connections = config.min_connections,
                max_connections = config.max_connections,
                "DB_MIN_CONNECTIONS exceeds DB_MAX_CONNECTIONS, clamping"
            );
            return Self {
                min_connections: config.max_connections,
                ..config
            };
        }
        config
    }

    pub fn max_connections(mut self, n: u32) -> Self {
        self.max_connections = n;
        self
    }
}

/// Connect with [`PoolConfig::default`].
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    create_pool_with_config(database_url, PoolConfig::default()).await
}

pub async fn create_pool_with_config(database_url: &str, config: PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "db",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        min_connections = config.min_connections,
        duration_ms = start.elapsed().as_millis() as u64,
        "Connected to PostgreSQL"
    );
    Ok(pool)
}

/// Log pool occupancy. Warns when every connection is checked out.
pub fn log_pool_metrics(pool: &PgPool) {
    let size = pool.size();
    let idle = pool.num_idle();

    if idle == 0 && size > 0 {
        warn!(
            subsystem = "db",
            component = "pool",
            pool_size = size,
            "No idle connections left in pool"
        );
    } else {
        debug!(
            subsystem = "db",
            component = "pool",
            pool_size = size,
            pool_idle = idle,
            "Pool occupancy"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> PoolConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        PoolConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_no_overrides_uses_defaults() {
        assert_eq!(config_from(&[]), PoolConfig::default());
    }

    #[test]
    fn test_overrides_applied() {
        let config = config_from(&[
            ("DB_MAX_CONNECTIONS", "25"),
            ("DB_MIN_CONNECTIONS", "4"),
            ("DB_CONNECT_TIMEOUT_SECS", " 5 "),
        ]);
        assert_eq!(config.max_connections, 25);
        assert_eq!(config.min_connections, 4);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_unparsable_values_fall_back() {
        let config = config_from(&[
            ("DB_MAX_CONNECTIONS", "lots"),
            ("DB_MIN_CONNECTIONS", "-1"),
            ("DB_CONNECT_TIMEOUT_SECS", ""),
        ]);
        assert_eq!(config, PoolConfig::default());

        let zero = config_from(&[("DB_MAX_CONNECTIONS", "0")]);
        assert_eq!(zero.max_connections, DEFAULT_MAX_CONNECTIONS);
    }

    #[test]
    fn test_min_clamped_to_max() {
        let config = config_from(&[("DB_MAX_CONNECTIONS", "3"), ("DB_MIN_CONNECTIONS", "8")]);
        assert_eq!(config.min_connections, 3);
    }
}
