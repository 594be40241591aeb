use thiserror::Error;

use super::CatalogTable;

/// Result alias used throughout the catalog core.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Failures of catalog mutations and reads.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("{kind} {id} does not exist")]
    NotFound { kind: CatalogTable, id: i32 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u32, available: i32 },

    #[error("Stock limit exceeded: requested {requested}, maximum allowed is {max}")]
    StockLimitExceeded { requested: u32, max: i32 },

    #[error("Transient transaction failure: {0}")]
    TransientTransactionFailure(String),

    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl CatalogError {
    pub fn not_found(kind: CatalogTable, id: impl Into<i32>) -> Self {
        CatalogError::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Deadlocks and serialization failures; only these are retried.
    pub fn is_transient(&self) -> bool {
        matches!(self, CatalogError::TransientTransactionFailure(_))
    }

    /// HTTP status class the web layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            CatalogError::NotFound { .. } => 404,
            CatalogError::Forbidden(_) => 403,
            CatalogError::Conflict(_)
            | CatalogError::InsufficientStock { .. }
            | CatalogError::StockLimitExceeded { .. } => 400,
            CatalogError::TransientTransactionFailure(_)
            | CatalogError::InternalInconsistency(_)
            | CatalogError::Database(_) => 500,
        }
    }
}

/// SQLSTATE codes Postgres reports for serialization failure and deadlock.
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            let code = db_err.code();
            if matches!(
                code.as_deref(),
                Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
            ) {
                return CatalogError::TransientTransactionFailure(db_err.message().to_string());
            }
            if db_err.is_unique_violation()
                || db_err.is_check_violation()
                || db_err.is_foreign_key_violation()
            {
                let detail = match db_err.constraint() {
                    Some(constraint) => format!("{} ({})", db_err.message(), constraint),
                    None => db_err.message().to_string(),
                };
                return CatalogError::Conflict(detail);
            }
        }
        CatalogError::Database(err)
    }
}
