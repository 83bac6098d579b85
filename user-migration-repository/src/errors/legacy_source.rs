use thiserror::Error;

/// Represents errors that can occur while reading the legacy store.
///
/// Every variant is fatal to a run. A missing metadata entry or a user without
/// qualifying activity is not an error and is reported through the return
/// value instead.
#[derive(Debug, Error)]
pub enum LegacySourceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Invalid table prefix: {0}")]
    InvalidTablePrefix(String),
}
