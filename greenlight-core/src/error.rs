use thiserror::Error;

/// Failures surfaced by the movie repositories.
#[derive(Error, Debug)]
pub enum DataError {
    /// The target row does not exist, or the id could never exist (`id < 1`).
    #[error("record not found")]
    RecordNotFound,

    /// The row was modified by another writer since the caller read it.
    #[error("edit conflict")]
    EditConflict,

    /// The store did not answer within the configured query timeout.
    #[error("query timed out")]
    QueryTimeout,

    /// Anything else reported by the backing store, passed through unchanged.
    #[error("database error: {0}")]
    Store(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, DataError>;
