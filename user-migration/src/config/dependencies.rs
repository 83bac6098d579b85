//! Dependency initialization and wiring for the user migration.

use std::sync::Arc;

use tracing::info;
use user_migration_pipeline::Orchestrator;
use user_migration_repository::{
    LegacySource, MySqlLegacySource, PostgresTargetStore, TargetStore,
};

use crate::config::MigrationSettings;
use crate::MigrationError;

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Connects both databases and builds the orchestrator.
    ///
    /// The legacy database must already be reachable, so any tunnel to it has
    /// to be started first.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(MigrationError)` - If a URL cannot be built or a connection fails
    pub async fn new(settings: &MigrationSettings) -> Result<Self, MigrationError> {
        let target: Arc<dyn TargetStore> =
            Arc::new(PostgresTargetStore::connect(&settings.postgres_url()?).await?);
        info!(
            host = %settings.postgres.host,
            database = %settings.postgres.name,
            "Connected to target database"
        );

        let source: Arc<dyn LegacySource> = Arc::new(
            MySqlLegacySource::connect(&settings.mysql_url()?, settings.source.clone()).await?,
        );
        info!(
            host = %settings.mysql.host,
            port = settings.mysql.port,
            database = %settings.mysql.name,
            "Connected to legacy database"
        );

        Ok(Dependencies {
            orchestrator: Orchestrator::new(source, target, settings.reconciler),
        })
    }
}
