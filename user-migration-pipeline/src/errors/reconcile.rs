//! Error types for the reconciler.
//! Every variant is fatal to the run; per-record skips are not errors.
use thiserror::Error;
use user_migration_repository::{LegacySourceError, TargetStoreError};
use user_migration_shared::GroupKind;

/// Represents errors that abort the reconciliation of a legacy user, and with
/// it the whole run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Legacy source error: {0}")]
    LegacySource(#[from] LegacySourceError),

    #[error("Target store error: {0}")]
    TargetStore(#[from] TargetStoreError),

    #[error("Legacy user {legacy_id} is eligible for a group but has no nickname")]
    MissingNickname { legacy_id: u64 },

    #[error("Group type {0} is missing from the target group_types table")]
    MissingGroupType(GroupKind),

    #[error("Legacy user id {0} does not fit the target legacy_id column")]
    LegacyIdOutOfRange(u64),
}
