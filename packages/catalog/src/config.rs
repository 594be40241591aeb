use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::kernel::TransactionPolicy;

/// Catalog configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub statement_timeout: Duration,
    pub tx_max_attempts: u32,
    pub tx_retry_delay: Duration,
    /// Upper bound for any stock level reached through restocking
    pub stock_max: i32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: parse_or("DB_MAX_CONNECTIONS", 10)?,
            statement_timeout: Duration::from_millis(parse_or(
                "CATALOG_STATEMENT_TIMEOUT_MS",
                5_000,
            )?),
            tx_max_attempts: parse_or("CATALOG_TX_MAX_ATTEMPTS", 3)?,
            tx_retry_delay: Duration::from_millis(parse_or("CATALOG_TX_RETRY_DELAY_MS", 50)?),
            stock_max: parse_or("STOCK_MAX", 10_000)?,
        })
    }

    pub fn transaction_policy(&self) -> TransactionPolicy {
        TransactionPolicy {
            statement_timeout: self.statement_timeout,
            max_attempts: self.tx_max_attempts.max(1),
            retry_delay: self.tx_retry_delay,
        }
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a valid number", key)),
        Err(_) => Ok(default),
    }
}
