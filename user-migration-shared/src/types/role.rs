use serde::{Deserialize, Serialize};

use crate::types::GroupKind;

/// A user role in the target system.
///
/// The discriminants are the numeric `role_id` values stored in the target
/// users table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Role {
    Admin = 3,
    LabelOwner = 4,
    Member = 5,
    /// Default for any legacy role that is missing or not recognised.
    Unprivileged = 6,
}

impl Role {
    pub fn id(&self) -> i32 {
        *self as i32
    }

    /// The group kind this role owns, if any.
    ///
    /// Only label owners and members are eligible for a group.
    pub fn group_kind(&self) -> Option<GroupKind> {
        match self {
            Role::Member => Some(GroupKind::Persona),
            Role::LabelOwner => Some(GroupKind::Label),
            Role::Admin | Role::Unprivileged => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ids() {
        assert_eq!(Role::Admin.id(), 3);
        assert_eq!(Role::LabelOwner.id(), 4);
        assert_eq!(Role::Member.id(), 5);
        assert_eq!(Role::Unprivileged.id(), 6);
    }

    #[test]
    fn test_only_members_and_label_owners_own_groups() {
        assert_eq!(Role::Member.group_kind(), Some(GroupKind::Persona));
        assert_eq!(Role::LabelOwner.group_kind(), Some(GroupKind::Label));
        assert_eq!(Role::Admin.group_kind(), None);
        assert_eq!(Role::Unprivileged.group_kind(), None);
    }
}
