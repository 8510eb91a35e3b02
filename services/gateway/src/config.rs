//! Process configuration
//!
//! Every option can come from the command line or the environment.

use clap::{Parser, ValueEnum};
use std::fmt;
use std::net::SocketAddr;
use thiserror::Error;

/// Shortest accepted token signing secret, in bytes
pub const MIN_SECRET_LEN: usize = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("jwt secret must be at least {min} bytes (got {len})")]
    SecretTooShort { len: usize, min: usize },

    #[error("database url must not be empty")]
    EmptyDatabaseUrl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable (development)
    Text,
    /// Flattened JSON lines (production)
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "gateway",
    about = "Threat monitoring event and alert API",
    version = env!("CARGO_PKG_VERSION"),
)]
pub struct Config {
    /// Address to bind the HTTP listener to
    #[arg(long, env = "MONITOR_LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: SocketAddr,

    /// SQLite connection URL
    #[arg(long, env = "MONITOR_DATABASE_URL", default_value = "sqlite://monitor.db?mode=rwc")]
    pub database_url: String,

    /// HS256 secret used to verify bearer tokens
    #[arg(long, env = "MONITOR_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Fallback log level when RUST_LOG is unset
    #[arg(long, env = "MONITOR_LOG_LEVEL", value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[arg(long, env = "MONITOR_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::SecretTooShort {
                len: self.jwt_secret.len(),
                min: MIN_SECRET_LEN,
            });
        }
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123";

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["gateway", "--jwt-secret", SECRET]).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "gateway",
            "--jwt-secret",
            SECRET,
            "--listen-addr",
            "127.0.0.1:9000",
            "--database-url",
            "sqlite::memory:",
            "--log-level",
            "debug",
            "--log-format",
            "json",
        ])
        .unwrap();
        assert_eq!(config.listen_addr.port(), 9000);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = Config::try_parse_from(["gateway", "--jwt-secret", "short"]).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::SecretTooShort { len: 5, .. })));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let result = Config::try_parse_from(["gateway", "--jwt-secret", SECRET, "--log-level", "loud"]);
        assert!(result.is_err());
    }
}
