//! Error types for the User Migration application.
//! Consolidates the errors of configuration, the stores, the tunnel and the
//! pipeline. Any of them ends the process with a failure exit code.
use user_migration_pipeline::OrchestratorError;
use user_migration_repository::{LegacySourceError, TargetStoreError};

use crate::tunnel::TunnelError;

#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Legacy source error: {0}")]
    LegacySource(#[from] LegacySourceError),
    #[error("Target store error: {0}")]
    TargetStore(#[from] TargetStoreError),
    #[error("Tunnel error: {0}")]
    Tunnel(#[from] TunnelError),
    #[error("Migration error: {0}")]
    Orchestrator(#[from] OrchestratorError),
}

impl MigrationError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
