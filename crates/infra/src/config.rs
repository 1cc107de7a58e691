//! Process configuration loaded from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `DATABASE_URL` | none (required for the Postgres backend) |
//! | `STORE_BACKEND` | `postgres` when `DATABASE_URL` is set, else `memory` |
//! | `BIND_ADDR` | `0.0.0.0:8080` |
//! | `DB_MAX_CONNECTIONS` | `4` |
//! | `DB_MIN_CONNECTIONS` | `2` |
//! | `DB_MAX_LIFETIME_SECS` | `1800` |
//! | `DB_ACQUIRE_TIMEOUT_SECS` | `30` |
//! | `RUN_MIGRATIONS` | `true` |

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Which repository implementation backs the services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

/// Connection pool settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub max_lifetime: Duration,
    pub acquire_timeout: Duration,
}

impl DbConfig {
    pub const DEFAULT_MAX_CONNECTIONS: u32 = 4;
    pub const DEFAULT_MIN_CONNECTIONS: u32 = 2;
    pub const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);
    pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

    /// Pool settings with defaults for everything but the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: Self::DEFAULT_MAX_CONNECTIONS,
            min_connections: Self::DEFAULT_MIN_CONNECTIONS,
            max_lifetime: Self::DEFAULT_MAX_LIFETIME,
            acquire_timeout: Self::DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub backend: StoreBackend,
    /// Present whenever `backend` is `Postgres`.
    pub db: Option<DbConfig>,
    pub run_migrations: bool,
}

impl AppConfig {
    pub const DEFAULT_BIND_ADDR: &'static str = "0.0.0.0:8080";

    /// Loads `.env` (if present) and reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                tracing::warn!(error = %e, "failed to load .env file");
            }
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL");
        let backend = match get("STORE_BACKEND") {
            Some(raw) => raw.parse::<StoreBackend>().map_err(|_| ConfigError::Invalid {
                key: "STORE_BACKEND",
                value: raw,
            })?,
            None if database_url.is_some() => StoreBackend::Postgres,
            None => StoreBackend::Memory,
        };

        let db = match backend {
            StoreBackend::Memory => None,
            StoreBackend::Postgres => {
                let url = database_url.ok_or(ConfigError::Missing("DATABASE_URL"))?;
                Some(DbConfig {
                    url,
                    max_connections: parse_or(
                        "DB_MAX_CONNECTIONS",
                        get("DB_MAX_CONNECTIONS"),
                        DbConfig::DEFAULT_MAX_CONNECTIONS,
                    )?,
                    min_connections: parse_or(
                        "DB_MIN_CONNECTIONS",
                        get("DB_MIN_CONNECTIONS"),
                        DbConfig::DEFAULT_MIN_CONNECTIONS,
                    )?,
                    max_lifetime: Duration::from_secs(parse_or(
                        "DB_MAX_LIFETIME_SECS",
                        get("DB_MAX_LIFETIME_SECS"),
                        DbConfig::DEFAULT_MAX_LIFETIME.as_secs(),
                    )?),
                    acquire_timeout: Duration::from_secs(parse_or(
                        "DB_ACQUIRE_TIMEOUT_SECS",
                        get("DB_ACQUIRE_TIMEOUT_SECS"),
                        DbConfig::DEFAULT_ACQUIRE_TIMEOUT.as_secs(),
                    )?),
                })
            }
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| Self::DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse::<SocketAddr>().map_err(|_| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_raw.clone(),
        })?;

        let run_migrations = match get("RUN_MIGRATIONS") {
            None => true,
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                key: "RUN_MIGRATIONS",
                value: raw,
            })?,
        };

        Ok(Self {
            bind_addr,
            backend,
            db,
            run_migrations,
        })
    }
}

fn parse_or<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn empty_environment_selects_memory_backend() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.backend, StoreBackend::Memory);
        assert!(cfg.db.is_none());
        assert_eq!(cfg.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert!(cfg.run_migrations);
    }

    #[test]
    fn database_url_implies_postgres_with_pool_defaults() {
        let cfg = load(&[("DATABASE_URL", "postgres://localhost/stock")]).unwrap();
        assert_eq!(cfg.backend, StoreBackend::Postgres);

        let db = cfg.db.unwrap();
        assert_eq!(db, DbConfig::new("postgres://localhost/stock"));
        assert_eq!(db.max_connections, 4);
        assert_eq!(db.min_connections, 2);
        assert_eq!(db.max_lifetime, Duration::from_secs(1800));
    }

    #[test]
    fn explicit_memory_backend_ignores_database_url() {
        let cfg = load(&[
            ("DATABASE_URL", "postgres://localhost/stock"),
            ("STORE_BACKEND", "memory"),
        ])
        .unwrap();
        assert_eq!(cfg.backend, StoreBackend::Memory);
        assert!(cfg.db.is_none());
    }

    #[test]
    fn postgres_without_url_is_missing() {
        assert_eq!(
            load(&[("STORE_BACKEND", "postgres")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );
    }

    #[test]
    fn invalid_numbers_are_reported_with_key() {
        let err = load(&[
            ("DATABASE_URL", "postgres://localhost/stock"),
            ("DB_MAX_CONNECTIONS", "many"),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "DB_MAX_CONNECTIONS",
                value: "many".to_string()
            }
        );
    }

    #[test]
    fn pool_overrides_and_migration_flag_are_read() {
        let cfg = load(&[
            ("DATABASE_URL", "postgres://localhost/stock"),
            ("DB_MAX_CONNECTIONS", "16"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "5"),
            ("RUN_MIGRATIONS", "false"),
            ("BIND_ADDR", "127.0.0.1:9000"),
        ])
        .unwrap();
        let db = cfg.db.unwrap();
        assert_eq!(db.max_connections, 16);
        assert_eq!(db.acquire_timeout, Duration::from_secs(5));
        assert!(!cfg.run_migrations);
        assert_eq!(cfg.bind_addr.port(), 9000);
    }

    #[test]
    fn unknown_backend_is_invalid() {
        assert!(matches!(
            load(&[("STORE_BACKEND", "redis")]),
            Err(ConfigError::Invalid { key: "STORE_BACKEND", .. })
        ));
    }
}
