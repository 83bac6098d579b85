//! This module defines the `Orchestrator` that drives one migration run.
//!
//! A run is strictly sequential: each legacy user is fully reconciled (user
//! upsert, then optional group upsert) before the next one is read. Nothing
//! spans records in a transaction, so a fatal error leaves the target
//! partially migrated; re-running resumes because migrated users match on
//! username and take the update branch.
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};
use user_migration_repository::{LegacySource, TargetStore};

use crate::dedup::IdentityDeduplicator;
use crate::errors::OrchestratorError;
use crate::reconciler::{GroupTypes, Reconciler, ReconcilerConfig};
use crate::reporter::RunReport;

/// Coordinates reading the legacy store, reconciling every candidate user
/// and reporting the totals.
pub struct Orchestrator {
    source: Arc<dyn LegacySource>,
    target: Arc<dyn TargetStore>,
    config: ReconcilerConfig,
}

impl Orchestrator {
    /// Creates a new `Orchestrator` instance.
    ///
    /// # Arguments
    ///
    /// * `source` - The legacy store to read accounts from
    /// * `target` - The target store to upsert users and groups into
    /// * `config` - Reconciler settings for this run
    pub fn new(
        source: Arc<dyn LegacySource>,
        target: Arc<dyn TargetStore>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            source,
            target,
            config,
        }
    }

    /// Runs the migration to completion or to the first fatal error.
    ///
    /// # Returns
    ///
    /// * `Ok(RunReport)` - Counts of inserted, updated and skipped rows plus
    ///   the target user count before and after the run
    /// * `Err(OrchestratorError)` - The first fatal error; earlier writes are
    ///   kept
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<RunReport, OrchestratorError> {
        let started = Instant::now();

        let users_before = self.target.count_users().await?;
        info!(count = users_before, "Target users before run");

        let group_types = GroupTypes::new(self.target.group_types().await?);
        info!(count = group_types.len(), "Loaded group types");

        let candidates = self.source.fetch_candidate_users().await?;
        info!(count = candidates.len(), "Fetched legacy users");

        let reconciler = Reconciler::new(
            self.source.clone(),
            self.target.clone(),
            group_types,
            self.config,
        );
        let mut dedup = IdentityDeduplicator::new();
        let mut report = RunReport::new(candidates.len() as u64, users_before);

        for user in &candidates {
            let outcome = reconciler
                .reconcile(user, &mut dedup)
                .await
                .map_err(|source| OrchestratorError::Reconcile {
                    legacy_id: user.id,
                    source,
                })?;
            report.record(&outcome);
        }

        report.users_after = self.target.count_users().await?;

        info!(
            elapsed_secs = started.elapsed().as_secs_f64(),
            "Processed all legacy users"
        );
        report.log();

        Ok(report)
    }
}
