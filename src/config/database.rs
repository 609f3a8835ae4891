use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::PgPool;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::{parse_or, string_or};

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub connect_options: PgConnectOptions,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    /// Upper bound for a single repository statement.
    pub statement_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// `DATABASE_URL` wins when set; otherwise the connection is assembled
    /// from the individual `DB_*` settings.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let connect_options = match lookup("DATABASE_URL") {
            Some(url) => PgConnectOptions::from_str(&url).context("invalid DATABASE_URL")?,
            None => {
                let ssl_mode = string_or(&lookup, "DB_SSLMODE", "disable");
                PgConnectOptions::new()
                    .host(&string_or(&lookup, "DB_HOST", "localhost"))
                    .port(parse_or(&lookup, "DB_PORT", 5432)?)
                    .username(&string_or(&lookup, "DB_USER", "postgres"))
                    .password(&string_or(&lookup, "DB_PASSWORD", ""))
                    .database(&string_or(&lookup, "DB_NAME", "user_api"))
                    .ssl_mode(PgSslMode::from_str(&ssl_mode).context("invalid DB_SSLMODE")?)
            }
        };

        Ok(DatabaseConfig {
            connect_options,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", 1)?,
            connect_timeout: Duration::from_secs(parse_or(&lookup, "DB_CONNECT_TIMEOUT_SECS", 30)?),
            idle_timeout: Duration::from_secs(parse_or(&lookup, "DB_IDLE_TIMEOUT_SECS", 600)?),
            statement_timeout: Duration::from_secs(parse_or(&lookup, "DB_STATEMENT_TIMEOUT_SECS", 5)?),
        })
    }

    pub async fn create_pool(&self) -> Result<PgPool> {
        let pool = PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(Some(self.idle_timeout))
            .connect_with(self.connect_options.clone())
            .await?;

        Ok(pool)
    }
}

pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
