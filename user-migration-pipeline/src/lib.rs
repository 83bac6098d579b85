//! # User Migration Pipeline
//! This crate holds the decision logic of the legacy user migration: mapping
//! legacy roles and countries, run-scoped deduplication of emails and
//! nicknames, the reconciliation engine that upserts users and their groups,
//! the run report and the orchestrator tying them together.
pub mod dedup;
pub mod errors;
pub mod mapper;
pub mod orchestrator;
pub mod reconciler;
pub mod reporter;

pub use dedup::{Admission, IdentityDeduplicator};
pub use errors::{OrchestratorError, ParseSettingError, ReconcileError};
pub use mapper::{map_role, CountryRegistry};
pub use orchestrator::Orchestrator;
pub use reconciler::{
    GroupMatchKey, GroupTypes, NicknameLookupPolicy, Reconciler, ReconcilerConfig, SkipReason,
    UserOutcome, WriteOutcome,
};
pub use reporter::{Counts, RunReport};
