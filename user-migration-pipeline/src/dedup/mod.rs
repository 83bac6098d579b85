//! Run-scoped uniqueness for emails and group display names.
//!
//! The legacy store guarantees neither, so the first occurrence within a run
//! wins and later ones are rejected. The deduplicator is created per run and
//! passed into the reconciler explicitly.
use std::collections::HashSet;

/// Result of offering a value to the deduplicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Admitted,
    /// The value was empty and was not recorded.
    Empty,
    /// The value was already admitted earlier in the run.
    Duplicate,
}

/// Append-only sets of the emails and nicknames seen in the current run.
///
/// Nicknames share one scope regardless of group kind, so a persona and a
/// label with the same display name collide.
#[derive(Debug, Default)]
pub struct IdentityDeduplicator {
    seen_emails: HashSet<String>,
    seen_nicknames: HashSet<String>,
}

impl IdentityDeduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn admit_email(&mut self, email: &str) -> Admission {
        admit(&mut self.seen_emails, email)
    }

    pub fn admit_nickname(&mut self, nickname: &str) -> Admission {
        admit(&mut self.seen_nicknames, nickname)
    }
}

fn admit(seen: &mut HashSet<String>, value: &str) -> Admission {
    if value.is_empty() {
        return Admission::Empty;
    }
    if seen.insert(value.to_string()) {
        Admission::Admitted
    } else {
        Admission::Duplicate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_email_is_admitted() {
        let mut dedup = IdentityDeduplicator::new();
        assert_eq!(dedup.admit_email("a@x.com"), Admission::Admitted);
        assert_eq!(dedup.admit_email("b@x.com"), Admission::Admitted);
        assert_eq!(dedup.seen_emails.len(), 2);
    }

    #[test]
    fn test_repeated_email_is_rejected() {
        let mut dedup = IdentityDeduplicator::new();
        dedup.admit_email("a@x.com");
        assert_eq!(dedup.admit_email("a@x.com"), Admission::Duplicate);
        assert_eq!(dedup.seen_emails.len(), 1);
    }

    #[test]
    fn test_empty_values_are_rejected_and_not_recorded() {
        let mut dedup = IdentityDeduplicator::new();
        assert_eq!(dedup.admit_email(""), Admission::Empty);
        assert_eq!(dedup.admit_email(""), Admission::Empty);
        assert_eq!(dedup.admit_nickname(""), Admission::Empty);
        assert_eq!(dedup.seen_emails.len(), 0);
        assert_eq!(dedup.seen_nicknames.len(), 0);
    }

    #[test]
    fn test_emails_and_nicknames_are_separate_scopes() {
        let mut dedup = IdentityDeduplicator::new();
        assert_eq!(dedup.admit_email("same"), Admission::Admitted);
        assert_eq!(dedup.admit_nickname("same"), Admission::Admitted);
    }

    #[test]
    fn test_nickname_scope_spans_group_kinds() {
        let mut dedup = IdentityDeduplicator::new();
        // A persona claims the name first; a label with the same name is rejected.
        assert_eq!(dedup.admit_nickname("Nightshift"), Admission::Admitted);
        assert_eq!(dedup.admit_nickname("Nightshift"), Admission::Duplicate);
    }

    #[test]
    fn test_comparison_is_exact() {
        let mut dedup = IdentityDeduplicator::new();
        assert_eq!(dedup.admit_email("a@x.com"), Admission::Admitted);
        assert_eq!(dedup.admit_email("A@x.com"), Admission::Admitted);
    }
}
