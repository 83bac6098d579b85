use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tenant every migrated user is assigned to.
pub const TENANT_ID: i32 = 0;

/// The mapped columns of a target user, built from a legacy account.
///
/// `username` is the natural key and mirrors the legacy email. On update every
/// column here is rewritten.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewTargetUser {
    pub username: String,
    pub password: String,
    pub role_id: i32,
    pub legacy_id: i32,
    /// ISO 3166-1 alpha-2 code, or empty when unknown.
    pub country: String,
    pub tenant_id: i32,
    pub member: bool,
}

/// A persisted row of the target users table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TargetUser {
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub role_id: i32,
    pub legacy_id: i32,
    pub country: String,
    pub tenant_id: i32,
    pub member: bool,
}

impl TargetUser {
    pub fn from_new(id: Uuid, user: NewTargetUser) -> Self {
        Self {
            id,
            username: user.username,
            password: user.password,
            role_id: user.role_id,
            legacy_id: user.legacy_id,
            country: user.country,
            tenant_id: user.tenant_id,
            member: user.member,
        }
    }
}
