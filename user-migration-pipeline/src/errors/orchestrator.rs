use thiserror::Error;
use user_migration_repository::{LegacySourceError, TargetStoreError};

use crate::errors::ReconcileError;

/// Represents errors that abort a migration run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Legacy source error: {0}")]
    LegacySource(#[from] LegacySourceError),

    #[error("Target store error: {0}")]
    TargetStore(#[from] TargetStoreError),

    #[error("Reconcile error for legacy user {legacy_id}: {source}")]
    Reconcile {
        legacy_id: u64,
        #[source]
        source: ReconcileError,
    },
}
