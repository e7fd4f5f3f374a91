//! Per-worktree status enrichment
//!
//! Fills in the fields of a parsed [`WorktreeRecord`] that need further git
//! queries: pending changes, the newest commit and the divergence from the
//! upstream branch. Each step runs inside the worktree's own directory.
//!
//! Enrichment never fails. A step whose query errors leaves its fields at
//! their defaults and the listing carries on with the next step and the
//! next record, so a worktree whose directory was deleted by hand still
//! shows up.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::constants::{
    AGE_JUST_NOW, GIT_HEAD, SECS_PER_DAY, SECS_PER_HOUR, SECS_PER_MINUTE,
};
use crate::git_interface::GitInterface;
use crate::worktree::WorktreeRecord;

/// Changed-path counts by change kind
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeCounts {
    pub modified: usize,
    pub added: usize,
    pub deleted: usize,
}

impl ChangeCounts {
    pub fn is_empty(&self) -> bool {
        self.modified == 0 && self.added == 0 && self.deleted == 0
    }
}

/// Classifies `git status --porcelain` output
///
/// The two-character code of every line is inspected for `M`, `A` and `D`
/// independently, so `AM` counts as both added and modified. A line whose
/// code has none of them is still a pending change: untracked `??` counts
/// as added, anything else (renames, copies, conflicts) as modified.
pub fn classify_status(raw: &str) -> ChangeCounts {
    let mut counts = ChangeCounts::default();

    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        let code: String = line.chars().take(2).collect();
        let mut matched = false;

        if code.contains('M') {
            counts.modified += 1;
            matched = true;
        }
        if code.contains('A') {
            counts.added += 1;
            matched = true;
        }
        if code.contains('D') {
            counts.deleted += 1;
            matched = true;
        }

        if !matched {
            if code == "??" {
                counts.added += 1;
            } else {
                counts.modified += 1;
            }
        }
    }

    counts
}

/// Splits `<subject>|<unix-timestamp>` on its last `|`
///
/// Returns `None` for empty output or an unparseable timestamp.
pub fn parse_last_commit(raw: &str) -> Option<(String, DateTime<Utc>)> {
    let (subject, timestamp) = raw.trim().rsplit_once('|')?;
    let seconds = timestamp.trim().parse::<i64>().ok()?;
    let time = DateTime::from_timestamp(seconds, 0)?;
    Some((subject.to_string(), time))
}

/// Human-relative label for the time since a commit
///
/// ```rust
/// use chrono::Duration;
/// use giwo::core::enrich::format_commit_age;
///
/// assert_eq!(format_commit_age(Duration::seconds(59)), "just now");
/// assert_eq!(format_commit_age(Duration::minutes(5)), "5m ago");
/// assert_eq!(format_commit_age(Duration::hours(23)), "23h ago");
/// assert_eq!(format_commit_age(Duration::days(3)), "3d ago");
/// ```
pub fn format_commit_age(elapsed: Duration) -> String {
    let secs = elapsed.num_seconds();

    if secs < SECS_PER_MINUTE {
        AGE_JUST_NOW.to_string()
    } else if secs < SECS_PER_HOUR {
        format!("{}m ago", secs / SECS_PER_MINUTE)
    } else if secs < SECS_PER_DAY {
        format!("{}h ago", secs / SECS_PER_HOUR)
    } else {
        format!("{}d ago", secs / SECS_PER_DAY)
    }
}

/// Reads the `(behind, ahead)` pair printed by `rev-list --left-right --count`
pub fn parse_divergence(raw: &str) -> Option<(usize, usize)> {
    let mut numbers = raw.split_whitespace().map(str::parse::<usize>);
    match (numbers.next(), numbers.next(), numbers.next()) {
        (Some(Ok(behind)), Some(Ok(ahead)), None) => Some((behind, ahead)),
        _ => None,
    }
}

/// Runs the enrichment queries for one listing
///
/// `now` is captured once so that every record of a listing is aged
/// against the same instant.
pub struct Enricher<'a, G: GitInterface + ?Sized> {
    git: &'a G,
    remote: &'a str,
    now: DateTime<Utc>,
}

impl<'a, G: GitInterface + ?Sized> Enricher<'a, G> {
    pub fn new(git: &'a G, remote: &'a str) -> Self {
        Self::with_now(git, remote, Utc::now())
    }

    pub fn with_now(git: &'a G, remote: &'a str, now: DateTime<Utc>) -> Self {
        Self { git, remote, now }
    }

    /// Populates `record` in place and hands it back
    pub fn enrich<'r>(&self, record: &'r mut WorktreeRecord) -> &'r mut WorktreeRecord {
        self.apply_status(record);
        self.apply_last_commit(record);
        self.apply_divergence(record);
        record
    }

    fn apply_status(&self, record: &mut WorktreeRecord) {
        match self.git.status(&record.path) {
            Ok(raw) => {
                let counts = classify_status(&raw);
                record.modified = counts.modified;
                record.added = counts.added;
                record.deleted = counts.deleted;
                record.is_clean = raw.trim().is_empty();
            }
            Err(e) => {
                warn!(path = %record.path.display(), error = %e, "status query failed");
            }
        }
    }

    fn apply_last_commit(&self, record: &mut WorktreeRecord) {
        let raw = match self.git.last_commit(&record.path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %record.path.display(), error = %e, "last commit query failed");
                return;
            }
        };

        match parse_last_commit(&raw) {
            Some((subject, time)) => {
                record.commit_age = format_commit_age(self.now - time);
                record.last_commit = subject;
                record.commit_time = Some(time);
            }
            None => debug!(path = %record.path.display(), %raw, "unparseable last commit"),
        }
    }

    fn apply_divergence(&self, record: &mut WorktreeRecord) {
        if record.branch.is_empty() || record.is_detached() {
            return;
        }

        let upstream = format!("{}/{}", self.remote, record.branch);
        match self.git.divergence(&record.path, &upstream, GIT_HEAD) {
            Ok(raw) => match parse_divergence(&raw) {
                Some((behind, ahead)) => {
                    record.behind = behind;
                    record.ahead = ahead;
                }
                None => debug!(%upstream, %raw, "unparseable divergence"),
            },
            // Usually just a branch that was never pushed
            Err(e) => debug!(%upstream, error = %e, "no divergence information"),
        }
    }
}
