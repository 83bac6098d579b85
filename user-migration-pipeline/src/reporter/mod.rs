//! Run statistics.
use std::fmt;
use tracing::info;

use crate::reconciler::{UserOutcome, WriteOutcome};

/// Inserted / updated / skipped tallies for one kind of target row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counts {
    pub inserted: u64,
    pub updated: u64,
    pub skipped: u64,
}

impl Counts {
    pub fn record(&mut self, outcome: &WriteOutcome) {
        match outcome {
            WriteOutcome::Inserted(_) => self.inserted += 1,
            WriteOutcome::Updated(_) => self.updated += 1,
            WriteOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Aggregate report of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Legacy users returned by the source.
    pub candidates: u64,
    pub users: Counts,
    pub groups: Counts,
    /// Target user rows before the first write.
    pub users_before: i64,
    /// Target user rows after the last write.
    pub users_after: i64,
}

impl RunReport {
    pub fn new(candidates: u64, users_before: i64) -> Self {
        Self {
            candidates,
            users_before,
            ..Self::default()
        }
    }

    pub fn record(&mut self, outcome: &UserOutcome) {
        self.users.record(&outcome.user);
        if let Some(group) = &outcome.group {
            self.groups.record(group);
        }
    }

    /// Emits the final totals as a structured log event.
    pub fn log(&self) {
        info!(
            candidates = self.candidates,
            users_inserted = self.users.inserted,
            users_updated = self.users.updated,
            users_skipped = self.users.skipped,
            groups_inserted = self.groups.inserted,
            groups_updated = self.groups.updated,
            groups_skipped = self.groups.skipped,
            users_before = self.users_before,
            users_after = self.users_after,
            "Migration finished"
        );
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "FINISHED")?;
        writeln!(f, "Legacy users read:  {}", self.candidates)?;
        writeln!(f, "Users inserted:     {}", self.users.inserted)?;
        writeln!(f, "Users updated:      {}", self.users.updated)?;
        writeln!(f, "Users skipped:      {}", self.users.skipped)?;
        writeln!(f, "Groups inserted:    {}", self.groups.inserted)?;
        writeln!(f, "Groups updated:     {}", self.groups.updated)?;
        writeln!(f, "Groups skipped:     {}", self.groups.skipped)?;
        writeln!(f, "Target users before: {}", self.users_before)?;
        write!(f, "Target users after:  {}", self.users_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconciler::SkipReason;
    use uuid::Uuid;

    fn outcome(user: WriteOutcome, group: Option<WriteOutcome>) -> UserOutcome {
        UserOutcome {
            legacy_id: 1,
            user,
            group,
        }
    }

    #[test]
    fn test_record_counts_users_and_groups_separately() {
        let mut report = RunReport::new(3, 10);
        let id = Uuid::new_v4();

        report.record(&outcome(
            WriteOutcome::Inserted(id),
            Some(WriteOutcome::Inserted(Uuid::new_v4())),
        ));
        report.record(&outcome(WriteOutcome::Updated(id), None));
        report.record(&outcome(WriteOutcome::Skipped(SkipReason::EmptyEmail), None));

        assert_eq!(
            report.users,
            Counts {
                inserted: 1,
                updated: 1,
                skipped: 1
            }
        );
        assert_eq!(
            report.groups,
            Counts {
                inserted: 1,
                updated: 0,
                skipped: 0
            }
        );
    }

    #[test]
    fn test_skipped_group_counts_as_group_skip() {
        let mut report = RunReport::new(1, 0);
        report.record(&outcome(
            WriteOutcome::Inserted(Uuid::new_v4()),
            Some(WriteOutcome::Skipped(SkipReason::DuplicateNickname)),
        ));

        assert_eq!(report.users.inserted, 1);
        assert_eq!(report.users.skipped, 0);
        assert_eq!(report.groups.skipped, 1);
    }

    #[test]
    fn test_display_summary() {
        let mut report = RunReport::new(2, 5);
        report.users.inserted = 1;
        report.users.skipped = 1;
        report.users_after = 6;

        let text = report.to_string();
        assert!(text.starts_with("FINISHED"));
        assert!(text.contains("Users inserted:     1"));
        assert!(text.contains("Users skipped:      1"));
        assert!(text.contains("Target users before: 5"));
        assert!(text.ends_with("Target users after:  6"));
    }
}
