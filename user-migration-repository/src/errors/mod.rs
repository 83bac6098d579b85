//! Error types for the user migration repository.
//! Consolidates and re-exports the errors of the legacy source and the target store.
mod legacy_source;
mod target_store;

pub use legacy_source::LegacySourceError;
pub use target_store::TargetStoreError;
