//! Error types for the data-access layer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures a store operation can surface.
///
/// A lookup that matches zero rows is not a failure; those operations
/// resolve with `Ok(None)` or an empty vec. Everything here propagates to
/// the caller instead of being logged and swallowed.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A unique constraint was violated, e.g. a duplicate email on insert.
    #[error("unique constraint violated: {0}")]
    Constraint(String),

    /// The backend was unreachable, or the pool timed out handing out a
    /// connection.
    #[error("database connection failed: {0}")]
    Connection(String),

    /// The input was malformed before any query ran.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Any other query-execution failure.
    #[error("query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            // SQLSTATE 23505: unique_violation
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                StoreError::Constraint(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Connection(e.to_string()),
            _ => StoreError::Query(e.to_string()),
        }
    }
}
