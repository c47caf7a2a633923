//! Process configuration read from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub use invoicer_observability::LogFormat;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_DATABASE_FILE: &str = "invoices.jsonl";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidBindAddr { var: &'static str, value: String },
    #[error("{var} must be one of in-memory, in-file, postgres (got {value})")]
    InvalidDatabase { var: &'static str, value: String },
    #[error("{var} must be json or pretty (got {value})")]
    InvalidLogFormat { var: &'static str, value: String },
    #[error("DATABASE_URL must be set when INVOICER_DATABASE=postgres")]
    MissingDatabaseUrl,
}

/// Which [`crate::Database`] backend to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseKind {
    #[default]
    InMemory,
    InFile,
    Postgres,
}

impl FromStr for DatabaseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-memory" | "memory" => Ok(Self::InMemory),
            "in-file" | "file" => Ok(Self::InFile),
            "postgres" => Ok(Self::Postgres),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database: DatabaseKind,
    pub database_file: PathBuf,
    pub database_url: Option<String>,
    /// JSON array of invoices loaded into the database on start-up.
    pub seed_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("INVOICER_BIND_ADDR") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidBindAddr {
                var: "INVOICER_BIND_ADDR",
                value,
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };

        let database = match get("INVOICER_DATABASE") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidDatabase {
                var: "INVOICER_DATABASE",
                value,
            })?,
            None => DatabaseKind::default(),
        };

        let log_format = match get("INVOICER_LOG_FORMAT") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidLogFormat {
                var: "INVOICER_LOG_FORMAT",
                value,
            })?,
            None => LogFormat::default(),
        };

        let database_url = get("DATABASE_URL");
        if database == DatabaseKind::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Self {
            bind_addr,
            database,
            database_file: get("INVOICER_DATABASE_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE)),
            database_url,
            seed_file: get("INVOICER_SEED_FILE").map(PathBuf::from),
            log_format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.database, DatabaseKind::InMemory);
        assert_eq!(config.database_file, PathBuf::from(DEFAULT_DATABASE_FILE));
        assert_eq!(config.database_url, None);
        assert_eq!(config.seed_file, None);
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("INVOICER_BIND_ADDR", "127.0.0.1:9000"),
            ("INVOICER_DATABASE", "in-file"),
            ("INVOICER_DATABASE_FILE", "/tmp/db.jsonl"),
            ("INVOICER_SEED_FILE", "seed.json"),
            ("INVOICER_LOG_FORMAT", "pretty"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.database, DatabaseKind::InFile);
        assert_eq!(config.database_file, PathBuf::from("/tmp/db.jsonl"));
        assert_eq!(config.seed_file, Some(PathBuf::from("seed.json")));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn postgres_requires_url() {
        let err = AppConfig::from_lookup(lookup(&[("INVOICER_DATABASE", "postgres")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingDatabaseUrl);

        let config = AppConfig::from_lookup(lookup(&[
            ("INVOICER_DATABASE", "postgres"),
            ("DATABASE_URL", "postgres://localhost/invoices"),
        ]))
        .unwrap();
        assert_eq!(config.database, DatabaseKind::Postgres);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("INVOICER_BIND_ADDR", "nowhere")])),
            Err(ConfigError::InvalidBindAddr { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("INVOICER_DATABASE", "mongo")])),
            Err(ConfigError::InvalidDatabase { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[("INVOICER_LOG_FORMAT", "xml")])),
            Err(ConfigError::InvalidLogFormat { .. })
        ));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = AppConfig::from_lookup(lookup(&[("INVOICER_DATABASE", "  ")])).unwrap();
        assert_eq!(config.database, DatabaseKind::InMemory);
    }
}
