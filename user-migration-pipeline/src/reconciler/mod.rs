//! The reconciliation engine.
//!
//! For each admitted legacy user the reconciler upserts a target user keyed by
//! username, then, for roles that own a group, upserts that group. Upserts are
//! read-then-write: look the row up by its natural key, update it if found,
//! insert it otherwise. This is only safe with a single writer; concurrent
//! runs would need a conditional upsert statement instead.
mod outcome;

pub use outcome::{SkipReason, UserOutcome, WriteOutcome};

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use user_migration_repository::{LegacySource, TargetStore};
use user_migration_shared::{
    GroupKind, GroupType, LegacyUser, NewTargetUser, NewUserGroup, Role, TENANT_ID,
};
use uuid::Uuid;

use crate::dedup::{Admission, IdentityDeduplicator};
use crate::errors::{ParseSettingError, ReconcileError};
use crate::mapper::{map_role, CountryRegistry};

/// Legacy metadata keys read per user.
pub const ROLE_META_KEY: &str = "role";
pub const COUNTRY_META_KEY: &str = "country";
pub const NICKNAME_META_KEY: &str = "nickname";

/// Natural key used to find a user's existing group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupMatchKey {
    #[default]
    DisplayName,
    Owner,
}

impl FromStr for GroupMatchKey {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "display-name" | "display_name" | "displayname" => Ok(Self::DisplayName),
            "owner" | "owner-id" | "owner_id" => Ok(Self::Owner),
            _ => Err(ParseSettingError {
                setting: "group match key",
                value: s.to_string(),
                expected: "display-name, owner",
            }),
        }
    }
}

/// What to do when a group-eligible user has no nickname entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NicknameLookupPolicy {
    /// Abort the run.
    #[default]
    Fatal,
    /// Skip the user's group and carry on.
    Skip,
}

impl FromStr for NicknameLookupPolicy {
    type Err = ParseSettingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fatal" => Ok(Self::Fatal),
            "skip" => Ok(Self::Skip),
            _ => Err(ParseSettingError {
                setting: "nickname lookup failure policy",
                value: s.to_string(),
                expected: "fatal, skip",
            }),
        }
    }
}

/// Configuration for the reconciler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcilerConfig {
    pub group_match_key: GroupMatchKey,
    pub nickname_lookup_failure: NicknameLookupPolicy,
}

/// The target's group type reference table, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct GroupTypes {
    by_name: HashMap<String, GroupType>,
}

impl GroupTypes {
    pub fn new(group_types: Vec<GroupType>) -> Self {
        let by_name = group_types
            .into_iter()
            .map(|t| (t.name.clone(), t))
            .collect();
        Self { by_name }
    }

    pub fn get(&self, kind: GroupKind) -> Option<&GroupType> {
        self.by_name.get(kind.name())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Decides, for each legacy user, whether to insert, update or skip the
/// target user and its group.
pub struct Reconciler {
    source: Arc<dyn LegacySource>,
    target: Arc<dyn TargetStore>,
    countries: CountryRegistry,
    group_types: GroupTypes,
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(
        source: Arc<dyn LegacySource>,
        target: Arc<dyn TargetStore>,
        group_types: GroupTypes,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            source,
            target,
            countries: CountryRegistry::new(),
            group_types,
            config,
        }
    }

    /// Reconciles one legacy user against the target store.
    ///
    /// `dedup` carries the emails and nicknames already claimed in this run.
    /// Soft failures come back as [`WriteOutcome::Skipped`]; any error is fatal
    /// to the run.
    #[instrument(skip(self, user, dedup), fields(legacy_id = user.id))]
    pub async fn reconcile(
        &self,
        user: &LegacyUser,
        dedup: &mut IdentityDeduplicator,
    ) -> Result<UserOutcome, ReconcileError> {
        let skip_reason = match dedup.admit_email(&user.email) {
            Admission::Admitted => None,
            Admission::Empty => Some(SkipReason::EmptyEmail),
            Admission::Duplicate => Some(SkipReason::DuplicateEmail),
        };
        if let Some(reason) = skip_reason {
            warn!(legacy_id = user.id, reason = %reason, "User skipped");
            return Ok(UserOutcome {
                legacy_id: user.id,
                user: WriteOutcome::Skipped(reason),
                group: None,
            });
        }

        let role_value = self.source.lookup_meta(user, ROLE_META_KEY).await?;
        if role_value.is_none() {
            debug!(legacy_id = user.id, "No role entry, defaulting to unprivileged");
        }
        let role = map_role(role_value.as_deref());

        let candidate = self.build_candidate(user, role).await?;

        let (user_outcome, owner_id) = self.upsert_user(&candidate).await?;

        let group = match role.group_kind() {
            Some(kind) => Some(self.reconcile_group(user, kind, owner_id, dedup).await?),
            None => None,
        };

        Ok(UserOutcome {
            legacy_id: user.id,
            user: user_outcome,
            group,
        })
    }

    async fn build_candidate(
        &self,
        user: &LegacyUser,
        role: Role,
    ) -> Result<NewTargetUser, ReconcileError> {
        let legacy_id =
            i32::try_from(user.id).map_err(|_| ReconcileError::LegacyIdOutOfRange(user.id))?;

        let member = self.source.has_qualifying_activity(user).await?;

        let country_name = self.source.lookup_meta(user, COUNTRY_META_KEY).await?;
        let country = self.countries.map_country(country_name.as_deref());
        if country.is_empty() {
            if let Some(name) = country_name.as_deref().filter(|n| !n.trim().is_empty()) {
                debug!(legacy_id = user.id, country = %name, "Unknown country, leaving empty");
            }
        }

        Ok(NewTargetUser {
            username: user.email.clone(),
            password: user.password.clone(),
            role_id: role.id(),
            legacy_id,
            country,
            tenant_id: TENANT_ID,
            member,
        })
    }

    /// Upserts the user by username and returns the id downstream rows must
    /// reference: the new id after an insert, the existing id after an update.
    async fn upsert_user(
        &self,
        candidate: &NewTargetUser,
    ) -> Result<(WriteOutcome, Uuid), ReconcileError> {
        match self.target.find_user_by_username(&candidate.username).await? {
            Some(existing) => {
                self.target.update_user(candidate).await?;
                debug!(user_id = %existing.id, legacy_id = candidate.legacy_id, "User updated");
                Ok((WriteOutcome::Updated(existing.id), existing.id))
            }
            None => {
                let id = self.target.insert_user(candidate).await?;
                debug!(user_id = %id, legacy_id = candidate.legacy_id, "User inserted");
                Ok((WriteOutcome::Inserted(id), id))
            }
        }
    }

    async fn reconcile_group(
        &self,
        user: &LegacyUser,
        kind: GroupKind,
        owner_id: Uuid,
        dedup: &mut IdentityDeduplicator,
    ) -> Result<WriteOutcome, ReconcileError> {
        let nickname = match self.source.lookup_meta(user, NICKNAME_META_KEY).await? {
            Some(nickname) => nickname,
            None => match self.config.nickname_lookup_failure {
                NicknameLookupPolicy::Fatal => {
                    return Err(ReconcileError::MissingNickname { legacy_id: user.id });
                }
                NicknameLookupPolicy::Skip => {
                    warn!(legacy_id = user.id, reason = %SkipReason::MissingNickname, "Group skipped");
                    return Ok(WriteOutcome::Skipped(SkipReason::MissingNickname));
                }
            },
        };

        let skip_reason = match dedup.admit_nickname(&nickname) {
            Admission::Admitted => None,
            Admission::Empty => Some(SkipReason::EmptyNickname),
            Admission::Duplicate => Some(SkipReason::DuplicateNickname),
        };
        if let Some(reason) = skip_reason {
            warn!(legacy_id = user.id, nickname = %nickname, reason = %reason, "Group skipped");
            return Ok(WriteOutcome::Skipped(reason));
        }

        let group_type = self
            .group_types
            .get(kind)
            .ok_or(ReconcileError::MissingGroupType(kind))?;

        let group = NewUserGroup {
            owner_id,
            display_name: nickname,
            type_id: group_type.id,
        };

        let existing = match self.config.group_match_key {
            GroupMatchKey::DisplayName => {
                self.target
                    .find_group_by_display_name(&group.display_name)
                    .await?
            }
            GroupMatchKey::Owner => self.target.find_group_by_owner(owner_id).await?,
        };

        match existing {
            Some(existing) => {
                self.target.update_group(existing.id, &group).await?;
                debug!(group_id = %existing.id, kind = %kind, "Group updated");
                Ok(WriteOutcome::Updated(existing.id))
            }
            None => {
                let id = self.target.insert_group(&group).await?;
                debug!(group_id = %id, kind = %kind, "Group inserted");
                Ok(WriteOutcome::Inserted(id))
            }
        }
    }
}
