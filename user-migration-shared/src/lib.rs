//! # User Migration Shared
//! This crate defines the data structures shared across the user migration:
//! legacy accounts as read from the source store, and users, group types and
//! user groups as written to the target store.
pub mod types;

pub use types::{
    GroupKind, GroupType, LegacyUser, NewTargetUser, NewUserGroup, Role, TargetUser, UserGroup,
    TENANT_ID,
};
