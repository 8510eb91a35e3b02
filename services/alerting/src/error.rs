use thiserror::Error;
use types::errors::ValidationError;

/// Errors surfaced by alerting operations
///
/// All variants are per-request failures; none are retried internally.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Integrity violation: {0}")]
    Integrity(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage failure: {0}")]
    Storage(#[source] sqlx::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return ServiceError::Integrity(format!(
                    "duplicate record rejected: {}",
                    db.message()
                ));
            }
            if db.is_foreign_key_violation() {
                return ServiceError::Integrity(format!(
                    "reference to a nonexistent record: {}",
                    db.message()
                ));
            }
        }
        ServiceError::Storage(err)
    }
}
