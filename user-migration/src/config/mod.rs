//! Configuration module for the User Migration.
//! Reads settings from the environment and wires up the run's dependencies.
mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{DatabaseSettings, MigrationSettings, TunnelSettings};
