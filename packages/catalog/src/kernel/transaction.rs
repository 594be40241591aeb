//! Transaction combinator used by every catalog mutation.
//!
//! A unit of work receives the transaction's connection and returns a boxed
//! future borrowing it. `with_transaction` owns begin/commit/rollback, bounds
//! every statement and lock wait with a local timeout, and re-runs the whole
//! unit of work when Postgres reports a deadlock or serialization failure.
//!
//! # Example
//!
//! ```rust,ignore
//! let id = with_transaction(&pool, &policy, move |conn| {
//!     let input = input.clone();
//!     Box::pin(async move { Pizza::insert(&input, conn).await })
//! })
//! .await?;
//! ```

use std::time::Duration;

use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool};
use tokio::time::sleep;
use tracing::{error, warn};

use crate::common::CatalogResult;

const DEFAULT_STATEMENT_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_RETRY_DELAY_MS: u64 = 50;

/// Timeout and retry bounds applied to each transaction.
#[derive(Debug, Clone)]
pub struct TransactionPolicy {
    pub statement_timeout: Duration,
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Linear backoff unit: attempt `n` waits `n * retry_delay`
    pub retry_delay: Duration,
}

impl Default for TransactionPolicy {
    fn default() -> Self {
        Self {
            statement_timeout: Duration::from_millis(DEFAULT_STATEMENT_TIMEOUT_MS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl TransactionPolicy {
    fn backoff(&self, attempt: u32) -> Duration {
        self.retry_delay * attempt
    }
}

/// Run `unit_of_work` inside one transaction, retrying transient failures.
pub async fn with_transaction<T, F>(
    pool: &PgPool,
    policy: &TransactionPolicy,
    mut unit_of_work: F,
) -> CatalogResult<T>
where
    T: Send,
    F: for<'c> FnMut(&'c mut PgConnection) -> BoxFuture<'c, CatalogResult<T>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match run_once(pool, policy, &mut unit_of_work).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_attempts => {
                warn!(
                    error = %e,
                    attempt,
                    max_attempts = policy.max_attempts,
                    "Transient transaction failure, retrying..."
                );
                sleep(policy.backoff(attempt)).await;
            }
            Err(e) => {
                if e.is_transient() {
                    error!(error = %e, attempts = attempt, "Transaction failed after all retries");
                }
                return Err(e);
            }
        }
    }
}

async fn run_once<T, F>(
    pool: &PgPool,
    policy: &TransactionPolicy,
    unit_of_work: &mut F,
) -> CatalogResult<T>
where
    F: for<'c> FnMut(&'c mut PgConnection) -> BoxFuture<'c, CatalogResult<T>>,
{
    let mut tx = pool.begin().await?;

    let timeout_ms = policy.statement_timeout.as_millis().to_string();
    sqlx::query(
        "SELECT set_config('statement_timeout', $1, true), set_config('lock_timeout', $1, true)",
    )
    .bind(&timeout_ms)
    .execute(&mut *tx)
    .await?;

    match unit_of_work(&mut *tx).await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            // Surface the unit-of-work error, not the rollback one
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_grows_linearly() {
        let policy = TransactionPolicy {
            retry_delay: Duration::from_millis(20),
            ..Default::default()
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(20));
        assert_eq!(policy.backoff(3), Duration::from_millis(60));
    }

    #[test]
    fn default_policy_retries_a_bounded_number_of_times() {
        let policy = TransactionPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.statement_timeout, Duration::from_secs(5));
    }
}
