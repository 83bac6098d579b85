//! User Migration Library
//!
//! Wires the migration pipeline to its collaborators: configuration from the
//! environment, the MySQL and PostgreSQL stores, and the SSH tunnel that makes
//! a remote legacy database reachable.

pub mod config;
pub mod errors;
pub mod tunnel;

pub use config::{Dependencies, MigrationSettings};
pub use errors::MigrationError;
pub use tunnel::{SshTunnel, TunnelState};
