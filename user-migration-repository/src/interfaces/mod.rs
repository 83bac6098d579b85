//! This module defines and re-exports the interfaces of the migration's two stores.
mod legacy_source;
mod target_store;

pub use legacy_source::{LegacySource, QUALIFYING_TRACK_STATUSES};
pub use target_store::TargetStore;
