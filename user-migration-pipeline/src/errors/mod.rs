//! Error types of the user migration pipeline.
mod config;
mod orchestrator;
mod reconcile;

pub use config::ParseSettingError;
pub use orchestrator::OrchestratorError;
pub use reconcile::ReconcileError;
