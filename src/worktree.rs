//! Worktree records and the porcelain listing parser
//!
//! `git worktree list --porcelain` prints one block per working copy,
//! separated by blank lines:
//!
//! ```text
//! worktree /repo
//! HEAD 3f1c0a9e...
//! branch refs/heads/main
//!
//! worktree /repo/.worktree/feature-auth
//! HEAD 91ab23cd...
//! branch refs/heads/feature-auth
//!
//! worktree /repo/.worktree/bisect
//! HEAD 77aa00ff...
//! detached
//! ```
//!
//! [`parse_worktree_list`] turns that text into [`WorktreeRecord`]s. Status
//! fields are filled in later by [`crate::core::enrich`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::constants::{
    DETACHED_BRANCH, GIT_REFS_HEADS, PORCELAIN_BRANCH, PORCELAIN_HEAD, PORCELAIN_WORKTREE,
};

/// One working copy of the repository
///
/// Records are built fresh for every listing and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorktreeRecord {
    /// Absolute location of the working copy; unique within a listing
    pub path: PathBuf,
    /// Checked-out branch, or [`DETACHED_BRANCH`] for a bare commit checkout
    pub branch: String,
    /// True for the originally cloned working directory
    #[serde(rename = "is_main")]
    pub is_primary: bool,
    pub is_clean: bool,
    pub ahead: usize,
    pub behind: usize,
    pub added: usize,
    pub modified: usize,
    pub deleted: usize,
    /// Subject line of the most recent commit, empty when unknown
    pub last_commit: String,
    pub commit_age: String,
    pub commit_time: Option<DateTime<Utc>>,
}

impl WorktreeRecord {
    /// Creates an unenriched record for `path`
    ///
    /// The record starts clean, with zero counts and an empty branch.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            branch: String::new(),
            is_primary: false,
            is_clean: true,
            ahead: 0,
            behind: 0,
            added: 0,
            modified: 0,
            deleted: 0,
            last_commit: String::new(),
            commit_age: String::new(),
            commit_time: None,
        }
    }

    /// Builder-style branch setter, handy in tests and fakes
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Whether the worktree has no symbolic branch
    pub fn is_detached(&self) -> bool {
        self.branch == DETACHED_BRANCH
    }

    /// Total number of pending changes across all change kinds
    pub fn change_count(&self) -> usize {
        self.modified + self.added + self.deleted
    }

    /// Whether the branch neither leads nor trails its upstream
    pub fn is_up_to_date(&self) -> bool {
        self.ahead == 0 && self.behind == 0
    }

    /// Whether the record lives at `path`
    pub fn is_at(&self, path: &Path) -> bool {
        same_path(&self.path, path)
    }
}

/// Aggregate numbers for one listing snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    /// Non-primary worktrees
    pub active: usize,
    pub dirty: usize,
    pub main_exists: bool,
}

impl Stats {
    pub fn from_records(records: &[WorktreeRecord]) -> Self {
        let mut stats = Stats {
            total: records.len(),
            ..Stats::default()
        };

        for record in records {
            if record.is_primary {
                stats.main_exists = true;
            } else {
                stats.active += 1;
            }

            if !record.is_clean {
                stats.dirty += 1;
            }
        }

        stats
    }
}

/// Parses `git worktree list --porcelain` output
///
/// Unknown lines are ignored so newer git versions that add keys keep
/// working. A `branch` line wins over the `HEAD` line of the same block;
/// a block without a `branch` line is reported as detached.
///
/// # Examples
///
/// ```rust
/// use giwo::worktree::parse_worktree_list;
///
/// let records = parse_worktree_list(
///     "worktree /repo\nHEAD abc\nbranch refs/heads/main\n\nworktree /repo/.worktree/x\nHEAD def\ndetached\n",
/// );
/// assert_eq!(records.len(), 2);
/// assert_eq!(records[0].branch, "main");
/// assert!(records[1].is_detached());
/// ```
pub fn parse_worktree_list(output: &str) -> Vec<WorktreeRecord> {
    let mut records = Vec::new();
    let mut current: Option<WorktreeRecord> = None;

    for line in output.lines() {
        let line = line.trim();

        if line.is_empty() {
            if let Some(record) = current.take() {
                records.push(record);
            }
            continue;
        }

        if let Some(path) = line.strip_prefix(PORCELAIN_WORKTREE) {
            // A block that was never terminated by a blank line still counts
            if let Some(record) = current.take() {
                records.push(record);
            }
            current = Some(WorktreeRecord::new(path));
        } else if let Some(reference) = line.strip_prefix(PORCELAIN_BRANCH) {
            if let Some(record) = current.as_mut() {
                record.branch = reference
                    .strip_prefix(GIT_REFS_HEADS)
                    .unwrap_or(reference)
                    .to_string();
            }
        } else if line.starts_with(PORCELAIN_HEAD) {
            if let Some(record) = current.as_mut() {
                if record.branch.is_empty() {
                    record.branch = DETACHED_BRANCH.to_string();
                }
            }
        }
    }

    if let Some(record) = current {
        records.push(record);
    }

    records
}

/// Compares two paths, falling back to their canonical forms
///
/// Git reports resolved paths while the repository root may come from a
/// different source (for instance a symlinked temp directory on macOS).
pub fn same_path(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
