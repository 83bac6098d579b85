use std::fmt;
use uuid::Uuid;

/// Why a user or a group was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyEmail,
    DuplicateEmail,
    EmptyNickname,
    DuplicateNickname,
    /// The nickname entry was missing and the run is configured to skip.
    MissingNickname,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            SkipReason::EmptyEmail => "blank email",
            SkipReason::DuplicateEmail => "duplicate email",
            SkipReason::EmptyNickname => "blank nickname",
            SkipReason::DuplicateNickname => "duplicate nickname",
            SkipReason::MissingNickname => "missing nickname",
        };
        f.write_str(reason)
    }
}

/// What happened to one target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Inserted(Uuid),
    Updated(Uuid),
    Skipped(SkipReason),
}

/// Result of reconciling one legacy user.
///
/// `group` is `None` when the user's role does not own a group or when the
/// user itself was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserOutcome {
    pub legacy_id: u64,
    pub user: WriteOutcome,
    pub group: Option<WriteOutcome>,
}
