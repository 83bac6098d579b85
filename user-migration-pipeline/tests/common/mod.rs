//! In-memory stores for exercising the pipeline without databases.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use user_migration_repository::interfaces::QUALIFYING_TRACK_STATUSES;
use user_migration_repository::{
    LegacySource, LegacySourceError, TargetStore, TargetStoreError,
};
use user_migration_shared::{
    GroupType, LegacyUser, NewTargetUser, NewUserGroup, TargetUser, UserGroup,
};
use uuid::Uuid;

/// Legacy store backed by plain collections.
#[derive(Default)]
pub struct InMemoryLegacySource {
    users: Vec<LegacyUser>,
    meta: HashMap<(u64, String), String>,
    track_statuses: HashMap<u64, Vec<i32>>,
    fail_fetch: bool,
    failing_meta_keys: Vec<String>,
}

fn read_failure() -> LegacySourceError {
    LegacySourceError::DatabaseError(sqlx::Error::PoolTimedOut)
}

impl InMemoryLegacySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, id: u64, email: &str) -> Self {
        self.users
            .push(LegacyUser::new(id, email, format!("$P$hash{}", id)));
        self
    }

    pub fn with_meta(mut self, id: u64, key: &str, value: &str) -> Self {
        self.meta.insert((id, key.to_string()), value.to_string());
        self
    }

    pub fn with_track(mut self, id: u64, status: i32) -> Self {
        self.track_statuses.entry(id).or_default().push(status);
        self
    }

    /// Makes reading the candidate users fail with a database error.
    pub fn failing_fetch(mut self) -> Self {
        self.fail_fetch = true;
        self
    }

    /// Makes every lookup of `key` fail with a database error.
    pub fn failing_meta(mut self, key: &str) -> Self {
        self.failing_meta_keys.push(key.to_string());
        self
    }
}

#[async_trait]
impl LegacySource for InMemoryLegacySource {
    async fn fetch_candidate_users(&self) -> Result<Vec<LegacyUser>, LegacySourceError> {
        if self.fail_fetch {
            return Err(read_failure());
        }
        Ok(self
            .users
            .iter()
            .filter(|u| !u.email.ends_with("@resonate.is"))
            .cloned()
            .collect())
    }

    async fn lookup_meta(
        &self,
        user: &LegacyUser,
        key: &str,
    ) -> Result<Option<String>, LegacySourceError> {
        if self.failing_meta_keys.iter().any(|k| k == key) {
            return Err(read_failure());
        }
        Ok(self.meta.get(&(user.id, key.to_string())).cloned())
    }

    async fn has_qualifying_activity(&self, user: &LegacyUser) -> Result<bool, LegacySourceError> {
        Ok(self
            .track_statuses
            .get(&user.id)
            .map(|statuses| {
                statuses
                    .iter()
                    .any(|s| QUALIFYING_TRACK_STATUSES.contains(s))
            })
            .unwrap_or(false))
    }
}

#[derive(Default)]
struct TargetState {
    users: Vec<TargetUser>,
    groups: Vec<UserGroup>,
    group_types: Vec<GroupType>,
    writes: usize,
    fail_after_writes: Option<usize>,
}

impl TargetState {
    fn check_write(&mut self) -> Result<(), TargetStoreError> {
        if let Some(limit) = self.fail_after_writes {
            if self.writes >= limit {
                return Err(TargetStoreError::DatabaseError(sqlx::Error::PoolTimedOut));
            }
        }
        self.writes += 1;
        Ok(())
    }
}

/// Target store backed by plain collections, with a unique username
/// constraint and optional write failure injection.
pub struct InMemoryTargetStore {
    state: Mutex<TargetState>,
}

impl InMemoryTargetStore {
    /// A store seeded with the `persona` and `label` group types.
    pub fn new() -> Self {
        Self::with_group_types(&["persona", "label"])
    }

    pub fn with_group_types(names: &[&str]) -> Self {
        let group_types = names
            .iter()
            .map(|name| GroupType {
                id: Uuid::new_v4(),
                name: name.to_string(),
            })
            .collect();
        Self {
            state: Mutex::new(TargetState {
                group_types,
                ..TargetState::default()
            }),
        }
    }

    /// Makes every write after the first `writes` fail with a database error.
    pub fn fail_after_writes(&self, writes: usize) {
        let mut state = self.state.lock().unwrap();
        state.fail_after_writes = Some(state.writes + writes);
    }

    pub fn clear_failures(&self) {
        self.state.lock().unwrap().fail_after_writes = None;
    }

    pub fn seed_user(&self, user: NewTargetUser) -> Uuid {
        let id = Uuid::new_v4();
        self.state
            .lock()
            .unwrap()
            .users
            .push(TargetUser::from_new(id, user));
        id
    }

    pub fn seed_group(&self, group: NewUserGroup) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().groups.push(UserGroup {
            id,
            owner_id: group.owner_id,
            display_name: group.display_name,
            type_id: group.type_id,
        });
        id
    }

    pub fn users(&self) -> Vec<TargetUser> {
        self.state.lock().unwrap().users.clone()
    }

    pub fn groups(&self) -> Vec<UserGroup> {
        self.state.lock().unwrap().groups.clone()
    }

    pub fn user(&self, username: &str) -> Option<TargetUser> {
        self.users().into_iter().find(|u| u.username == username)
    }

    pub fn group_type_id(&self, name: &str) -> Uuid {
        self.state
            .lock()
            .unwrap()
            .group_types
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.id)
            .unwrap()
    }
}

#[async_trait]
impl TargetStore for InMemoryTargetStore {
    async fn count_users(&self) -> Result<i64, TargetStoreError> {
        Ok(self.state.lock().unwrap().users.len() as i64)
    }

    async fn group_types(&self) -> Result<Vec<GroupType>, TargetStoreError> {
        Ok(self.state.lock().unwrap().group_types.clone())
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<TargetUser>, TargetStoreError> {
        Ok(self.user(username))
    }

    async fn insert_user(&self, user: &NewTargetUser) -> Result<Uuid, TargetStoreError> {
        let mut state = self.state.lock().unwrap();
        state.check_write()?;
        if state.users.iter().any(|u| u.username == user.username) {
            return Err(TargetStoreError::DatabaseError(sqlx::Error::Protocol(
                "duplicate key value violates unique constraint \"users_username_key\"".into(),
            )));
        }
        let id = Uuid::new_v4();
        state.users.push(TargetUser::from_new(id, user.clone()));
        Ok(id)
    }

    async fn update_user(&self, user: &NewTargetUser) -> Result<(), TargetStoreError> {
        let mut state = self.state.lock().unwrap();
        state.check_write()?;
        let existing = state
            .users
            .iter_mut()
            .find(|u| u.username == user.username)
            .ok_or_else(|| TargetStoreError::UserNotFound(user.username.clone()))?;
        *existing = TargetUser::from_new(existing.id, user.clone());
        Ok(())
    }

    async fn find_group_by_display_name(
        &self,
        display_name: &str,
    ) -> Result<Option<UserGroup>, TargetStoreError> {
        Ok(self
            .groups()
            .into_iter()
            .find(|g| g.display_name == display_name))
    }

    async fn find_group_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<UserGroup>, TargetStoreError> {
        Ok(self.groups().into_iter().find(|g| g.owner_id == owner_id))
    }

    async fn insert_group(&self, group: &NewUserGroup) -> Result<Uuid, TargetStoreError> {
        let mut state = self.state.lock().unwrap();
        state.check_write()?;
        let id = Uuid::new_v4();
        state.groups.push(UserGroup {
            id,
            owner_id: group.owner_id,
            display_name: group.display_name.clone(),
            type_id: group.type_id,
        });
        Ok(id)
    }

    async fn update_group(&self, id: Uuid, group: &NewUserGroup) -> Result<(), TargetStoreError> {
        let mut state = self.state.lock().unwrap();
        state.check_write()?;
        let existing = state
            .groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(TargetStoreError::GroupNotFound(id))?;
        existing.display_name = group.display_name.clone();
        existing.type_id = group.type_id;
        Ok(())
    }
}
