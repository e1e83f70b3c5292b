use std::env;
use std::fmt;
use std::time::Duration;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const HOST: &str = "HOST";
    pub const PORT: &str = "PORT";
    pub const DB_HOST: &str = "DB_HOST";
    pub const DB_PORT: &str = "DB_PORT";
    /// Path of the SQLite database file
    pub const DB_DATABASE: &str = "DB_DATABASE";
    pub const DB_USER: &str = "DB_USER";
    pub const DB_PASSWORD: &str = "DB_PASSWORD";
    /// Maximum number of pooled connections
    pub const DB_POOL_SIZE: &str = "DB_POOL_SIZE";
    /// Seconds to wait for a pooled connection before giving up
    pub const DB_CONNECT_TIMEOUT_SECS: &str = "DB_CONNECT_TIMEOUT_SECS";
}

/// Default values
pub mod defaults {
    pub const HOST: &str = "0.0.0.0";
    pub const PORT: u16 = 5000;
    pub const DB_HOST: &str = "localhost";
    pub const DB_PORT: u16 = 5432;
    pub const DB_DATABASE: &str = "./.db/notes.db";
    pub const DB_POOL_SIZE: u32 = 8;
    pub const DB_CONNECT_TIMEOUT_SECS: u64 = 5;
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a valid number (got {value:?})")]
    Invalid { var: &'static str, value: String },
}

/// Connection settings for the note store.
///
/// The store is an embedded SQLite file named by `database`. Host, port, user
/// and password are accepted so existing deployments keep their environment,
/// but only show up in the startup log.
#[derive(Clone)]
pub struct DbConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: Option<String>,
    pub password: Option<String>,
    pub pool_size: u32,
    pub connect_timeout: Duration,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("pool_size", &self.pool_size)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: defaults::DB_HOST.to_string(),
            port: defaults::DB_PORT,
            database: defaults::DB_DATABASE.to_string(),
            user: None,
            password: None,
            pool_size: defaults::DB_POOL_SIZE,
            connect_timeout: Duration::from_secs(defaults::DB_CONNECT_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db: DbConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db = DbConfig {
            host: get(env_vars::DB_HOST).unwrap_or_else(|| defaults::DB_HOST.to_string()),
            port: parse_or(get(env_vars::DB_PORT), env_vars::DB_PORT, defaults::DB_PORT)?,
            database: get(env_vars::DB_DATABASE)
                .unwrap_or_else(|| defaults::DB_DATABASE.to_string()),
            user: get(env_vars::DB_USER),
            password: get(env_vars::DB_PASSWORD),
            pool_size: parse_or(
                get(env_vars::DB_POOL_SIZE),
                env_vars::DB_POOL_SIZE,
                defaults::DB_POOL_SIZE,
            )?
            .max(1),
            connect_timeout: Duration::from_secs(parse_or(
                get(env_vars::DB_CONNECT_TIMEOUT_SECS),
                env_vars::DB_CONNECT_TIMEOUT_SECS,
                defaults::DB_CONNECT_TIMEOUT_SECS,
            )?),
        };

        Ok(Self {
            host: get(env_vars::HOST).unwrap_or_else(|| defaults::HOST.to_string()),
            port: parse_or(get(env_vars::PORT), env_vars::PORT, defaults::PORT)?,
            db,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value: raw }),
        None => Ok(default),
    }
}
