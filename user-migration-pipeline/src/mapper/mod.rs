//! Pure mappings from legacy free-text values to target values.
//!
//! Neither mapping can fail: an unknown role becomes [`Role::Unprivileged`]
//! and an unknown country becomes an empty code.
mod countries;

use std::collections::HashMap;
use user_migration_shared::Role;

use countries::COUNTRY_NAMES;

/// Maps the legacy `role` metadata value to a target role.
///
/// `None` stands for a user without a role entry.
pub fn map_role(role: Option<&str>) -> Role {
    match role {
        Some("member") => Role::Member,
        Some("label-owner") => Role::LabelOwner,
        Some("admin") => Role::Admin,
        _ => Role::Unprivileged,
    }
}

/// Lookup table from English country names to ISO 3166-1 alpha-2 codes.
///
/// Built once per run; lookups are case-insensitive and ignore surrounding
/// whitespace.
#[derive(Debug, Clone)]
pub struct CountryRegistry {
    by_name: HashMap<String, &'static str>,
}

impl CountryRegistry {
    pub fn new() -> Self {
        let by_name = COUNTRY_NAMES
            .iter()
            .map(|(name, code)| (name.to_lowercase(), *code))
            .collect();
        Self { by_name }
    }

    /// Returns the alpha-2 code for `name`, if it is a known country name.
    pub fn lookup(&self, name: &str) -> Option<&'static str> {
        let key = name.trim().to_lowercase();
        if key.is_empty() {
            return None;
        }
        self.by_name.get(&key).copied()
    }

    /// Maps a free-text country to its alpha-2 code, or to an empty string
    /// when the name is missing or unknown.
    pub fn map_country(&self, name: Option<&str>) -> String {
        name.and_then(|n| self.lookup(n))
            .map(str::to_string)
            .unwrap_or_default()
    }
}

impl Default for CountryRegistry {
    fn default() -> Self {
        Self::new()
    }
}
