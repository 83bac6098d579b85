//! Read-only access to the legacy store.
use async_trait::async_trait;
use user_migration_shared::LegacyUser;

use crate::errors::LegacySourceError;

/// Track statuses that count as member activity.
pub const QUALIFYING_TRACK_STATUSES: [i32; 3] = [0, 2, 3];

/// Abstracts the legacy store the accounts are migrated from.
///
/// Implementations must not write to the store.
#[async_trait]
pub trait LegacySource: Send + Sync {
    /// Fetches the accounts to migrate, in a stable order.
    ///
    /// Accounts whose email already belongs to the target system's own domain
    /// are excluded so that natively created accounts are never re-imported.
    async fn fetch_candidate_users(&self) -> Result<Vec<LegacyUser>, LegacySourceError>;

    /// Looks up a metadata value for a user.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(value))` - The value stored under `key`
    /// * `Ok(None)` - The user has no entry for `key`
    /// * `Err(LegacySourceError)` - The lookup itself failed
    async fn lookup_meta(
        &self,
        user: &LegacyUser,
        key: &str,
    ) -> Result<Option<String>, LegacySourceError>;

    /// Returns whether the user owns at least one track whose status is in
    /// [`QUALIFYING_TRACK_STATUSES`].
    async fn has_qualifying_activity(&self, user: &LegacyUser) -> Result<bool, LegacySourceError>;
}
