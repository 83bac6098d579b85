//! MySQL implementation of the legacy source.
//!
//! Reads a WordPress-style schema: `{prefix}users`, `{prefix}usermeta` and an
//! unprefixed `tracks` table carrying an owner (`uid`) and a `status`.
mod legacy_source;

pub use legacy_source::{MySqlLegacySource, MySqlSourceConfig};
