use thiserror::Error;

/// Errors surfaced by the person store.
///
/// `NotFound` is reserved for a missing aggregate root; every other storage
/// failure is wrapped with the failing operation's name and propagated as
/// `Database`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("not found")]
    NotFound,
}

impl StoreError {
    /// Wrap a write or transaction failure with the operation that caused it.
    pub(crate) fn database_operation(table: &str, operation: &str, err: sqlx::Error) -> Self {
        StoreError::Database(format!("failed to {} on {}: {}", operation, table, err))
    }

    /// Wrap a read failure with the query that caused it.
    pub(crate) fn query_execution(table: &str, operation: &str, err: sqlx::Error) -> Self {
        StoreError::Database(format!("failed to {} from {}: {}", operation, table, err))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound)
    }
}
