use thiserror::Error;

/// Errors produced by the store layer.
///
/// A read that finds no row is not an error; `find_*` methods return
/// `Ok(None)` for that case.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A write was rejected by the store's integrity rules (foreign key,
    /// uniqueness, CHECK).  Retrying cannot change the outcome without a
    /// change in data.
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// Any other SQLite failure, including connectivity and lock timeouts.
    #[error("Database error: {0}")]
    Sqlite(rusqlite::Error),

    /// Malformed input rejected before any store interaction.
    #[error("Invalid input: {0}")]
    Validation(&'static str),

    /// Failed to determine a platform data directory.
    #[error("Could not determine application data directory")]
    NoDataDir,

    /// Generic I/O error (e.g. creating the database directory).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Migration failure.
    #[error("Migration error: {0}")]
    Migration(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e {
            rusqlite::Error::SqliteFailure(err, msg)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Constraint(msg.unwrap_or_else(|| err.to_string()))
            }
            other => StoreError::Sqlite(other),
        }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
