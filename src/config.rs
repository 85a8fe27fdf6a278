//! Runtime settings parsed from command-line flags and the environment.
//!
//! A `.env` file in the working directory is loaded before parsing, so every
//! flag can also be supplied through the variable named in its `env`
//! attribute.

use clap::{Parser, ValueEnum};
use std::net::{IpAddr, SocketAddr};
use thiserror::Error;

/// Lowest cost accepted by bcrypt.
const MIN_BCRYPT_COST: u32 = 4;
/// Highest cost accepted by bcrypt.
const MAX_BCRYPT_COST: u32 = 31;

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// `PostgreSQL` through Diesel.
    Postgres,
    /// Process-local maps; data is lost on exit.
    Memory,
}

/// Service settings.
#[derive(Debug, Clone, Parser)]
#[command(name = "task_todo")]
#[command(about = "Task review workflow service", long_about = None)]
#[command(version)]
pub struct Settings {
    /// Interface to bind.
    #[arg(long, env = "APP_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, env = "APP_PORT", default_value_t = 8082)]
    pub port: u16,

    /// Storage backend.
    #[arg(long, env = "STORAGE", value_enum, default_value_t = StorageKind::Postgres)]
    pub storage: StorageKind,

    /// Full connection URL; overrides the individual `DB_*` settings.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Database host.
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port.
    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    pub db_port: u16,

    /// Database user.
    #[arg(long, env = "DB_USER", default_value = "postgres")]
    pub db_user: String,

    /// Database password.
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    pub db_password: String,

    /// Database name.
    #[arg(long, env = "DB_NAME", default_value = "task_todo")]
    pub db_name: String,

    /// Maximum pooled database connections.
    #[arg(long, env = "DB_POOL_SIZE", default_value_t = 10)]
    pub db_pool_size: u32,

    /// HMAC secret used to sign bearer tokens.
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Token lifetime in hours.
    #[arg(long, env = "JWT_TTL_HOURS", default_value_t = 24)]
    pub jwt_ttl_hours: i64,

    /// Bcrypt work factor for seeded passwords.
    #[arg(long, env = "BCRYPT_COST", default_value_t = 12)]
    pub bcrypt_cost: u32,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Emit logs as JSON.
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

/// Invalid settings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The token secret is empty.
    #[error("JWT_SECRET must not be empty")]
    EmptyJwtSecret,
    /// The token lifetime is not positive.
    #[error("JWT_TTL_HOURS must be positive, got {0}")]
    InvalidTokenTtl(i64),
    /// The bcrypt cost is outside the supported range.
    #[error("BCRYPT_COST must be between 4 and 31, got {0}")]
    InvalidBcryptCost(u32),
    /// The pool size is zero.
    #[error("DB_POOL_SIZE must be at least 1")]
    EmptyPool,
    /// The listen host is not an IP address.
    #[error("invalid listen host '{0}'")]
    InvalidHost(String),
    /// A `.env` file is present but unreadable or malformed.
    #[error("failed to load .env file: {0}")]
    EnvFile(String),
}

/// Accepts a missing `.env` file and rejects any other load failure.
fn check_env_file<T>(loaded: Result<T, dotenvy::Error>) -> Result<(), ConfigError> {
    match loaded {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::EnvFile(err.to_string())),
    }
}

impl Settings {
    /// Loads `.env` if present and parses settings from the process
    /// arguments and environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EnvFile`] when a `.env` file exists but cannot
    /// be read, or another [`ConfigError`] when a parsed value fails
    /// validation. Clap parse failures print usage and exit.
    pub fn load() -> Result<Self, ConfigError> {
        check_env_file(dotenvy::dotenv())?;
        let settings = Self::parse();
        settings.validate()?;
        Ok(settings)
    }

    /// Checks cross-field constraints clap cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::EmptyJwtSecret);
        }
        if self.jwt_ttl_hours <= 0 || chrono::Duration::try_hours(self.jwt_ttl_hours).is_none() {
            return Err(ConfigError::InvalidTokenTtl(self.jwt_ttl_hours));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidBcryptCost(self.bcrypt_cost));
        }
        if self.db_pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        self.listen_addr().map(|_| ())
    }

    /// Returns the socket address to bind.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHost`] when the host is not an IP
    /// address.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Returns the database URL, assembling it from `DB_*` parts when
    /// `DATABASE_URL` is unset.
    #[must_use]
    pub fn database_url(&self) -> String {
        self.database_url.clone().unwrap_or_else(|| {
            format!(
                "postgres://{}:{}@{}:{}/{}",
                self.db_user, self.db_password, self.db_host, self.db_port, self.db_name
            )
        })
    }

    /// Returns the token lifetime.
    #[must_use]
    pub const fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.jwt_ttl_hours)
    }
}
