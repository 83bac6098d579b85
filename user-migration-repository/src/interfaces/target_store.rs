//! Read-write access to the target store.
use async_trait::async_trait;
use user_migration_shared::{GroupType, NewTargetUser, NewUserGroup, TargetUser, UserGroup};
use uuid::Uuid;

use crate::errors::TargetStoreError;

/// Abstracts the target store the accounts are migrated into.
///
/// Each method is a single statement that either fully applies or fails. The
/// store offers no cross-statement transaction: callers get upsert semantics
/// by looking a row up by its natural key and then branching to insert or
/// update.
#[async_trait]
pub trait TargetStore: Send + Sync {
    /// Number of rows in the users table.
    async fn count_users(&self) -> Result<i64, TargetStoreError>;

    /// All rows of the group type reference table.
    async fn group_types(&self) -> Result<Vec<GroupType>, TargetStoreError>;

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<TargetUser>, TargetStoreError>;

    /// Inserts a user and returns its generated id.
    async fn insert_user(&self, user: &NewTargetUser) -> Result<Uuid, TargetStoreError>;

    /// Overwrites every mapped column of the user whose username matches
    /// `user.username`.
    ///
    /// Fails with [`TargetStoreError::UserNotFound`] if no row matched.
    async fn update_user(&self, user: &NewTargetUser) -> Result<(), TargetStoreError>;

    async fn find_group_by_display_name(
        &self,
        display_name: &str,
    ) -> Result<Option<UserGroup>, TargetStoreError>;

    async fn find_group_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<UserGroup>, TargetStoreError>;

    /// Inserts a user group and returns its generated id.
    async fn insert_group(&self, group: &NewUserGroup) -> Result<Uuid, TargetStoreError>;

    /// Overwrites the display name and type of the group with the given id.
    ///
    /// The owner is left unchanged. Fails with
    /// [`TargetStoreError::GroupNotFound`] if no row matched.
    async fn update_group(&self, id: Uuid, group: &NewUserGroup) -> Result<(), TargetStoreError>;
}
