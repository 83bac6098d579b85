use thiserror::Error;
use uuid::Uuid;

/// Represents errors that can occur while reading or writing the target store.
#[derive(Debug, Error)]
pub enum TargetStoreError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("No user with username {0}")]
    UserNotFound(String),

    #[error("No user group with id {0}")]
    GroupNotFound(Uuid),
}
