// Environment-driven configuration

pub mod app;
pub mod database;

pub use app::{AppConfig, LogFormat};
pub use database::{run_migrations, DatabaseConfig};

use anyhow::{anyhow, Result};
use std::fmt::Display;
use std::str::FromStr;

/// Reads `key` through `lookup`, parsing it when present and falling back
/// to `default` when absent. A present but unparseable value is an error.
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid value for {}: {} ({})", key, raw, e)),
        None => Ok(default),
    }
}

pub(crate) fn string_or<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}
