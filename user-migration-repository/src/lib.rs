//! # User Migration Repository
//! This crate provides the traits the migration uses to read the legacy store
//! and to read and write the target store, together with their error types and
//! concrete implementations for MySQL (legacy) and PostgreSQL (target).
pub mod errors;
pub mod interfaces;
pub mod mysql;
pub mod postgres;

pub use errors::{LegacySourceError, TargetStoreError};
pub use interfaces::{LegacySource, TargetStore};
pub use mysql::{MySqlLegacySource, MySqlSourceConfig};
pub use postgres::PostgresTargetStore;
