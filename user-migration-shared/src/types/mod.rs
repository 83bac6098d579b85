mod group_type;
mod legacy_user;
mod role;
mod target_user;
mod user_group;

pub use group_type::{GroupKind, GroupType};
pub use legacy_user::LegacyUser;
pub use role::Role;
pub use target_user::{NewTargetUser, TargetUser, TENANT_ID};
pub use user_group::{NewUserGroup, UserGroup};
