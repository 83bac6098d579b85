//! PostgreSQL implementation of the target store.
//!
//! ## Database Tables
//!
//! - `users`: migrated accounts, unique on `username`
//! - `group_types`: reference table of group kinds (`persona`, `label`)
//! - `user_groups`: groups owned by users, typed by `group_types`
//!
//! The schema used by the integration tests lives in `migrations/`.
mod target_store;

pub use target_store::PostgresTargetStore;
