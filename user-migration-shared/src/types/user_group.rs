use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The columns of a user group to be inserted or overwritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewUserGroup {
    pub owner_id: Uuid,
    pub display_name: String,
    pub type_id: Uuid,
}

/// A persisted row of the target `user_groups` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserGroup {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub display_name: String,
    pub type_id: Uuid,
}
