use serde::{Deserialize, Serialize};

/// An account row from the legacy users table.
///
/// Read once per run and never written back. The password hash is opaque and
/// is carried over to the target verbatim.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LegacyUser {
    pub id: u64,
    pub email: String,
    pub password: String,
}

impl LegacyUser {
    pub fn new(id: u64, email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            password: password.into(),
        }
    }
}
