use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The kind of group an eligible user owns in the target system.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum GroupKind {
    /// An artist profile, owned by members.
    Persona,
    /// A record label, owned by label owners.
    Label,
}

impl GroupKind {
    /// Name of the matching row in the `group_types` reference table.
    pub fn name(&self) -> &'static str {
        match self {
            GroupKind::Persona => "persona",
            GroupKind::Label => "label",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A row of the target's `group_types` reference table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupType {
    pub id: Uuid,
    pub name: String,
}
