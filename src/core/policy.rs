//! Protected and merged branch policy
//!
//! Decides which branches `clean` may touch: a branch is a candidate when
//! it is fully merged into the upstream of one of the merge bases and is
//! not protected.

use tracing::debug;

use crate::config::BranchesConfig;
use crate::constants::{GIT_CURRENT_BRANCH_MARKER, GIT_OTHER_WORKTREE_MARKER};
use crate::error::{GiwoError, Result};
use crate::git_interface::GitInterface;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPolicy {
    protected: Vec<String>,
    merge_bases: Vec<String>,
    remote: String,
}

impl Default for BranchPolicy {
    fn default() -> Self {
        Self::from_config(&BranchesConfig::default())
    }
}

impl BranchPolicy {
    pub fn new(protected: Vec<String>, merge_bases: Vec<String>, remote: impl Into<String>) -> Self {
        Self {
            protected,
            merge_bases,
            remote: remote.into(),
        }
    }

    pub fn from_config(config: &BranchesConfig) -> Self {
        Self::new(
            config.protected.clone(),
            config.merge_bases.clone(),
            config.remote.clone(),
        )
    }

    /// Exact-match check against the protected set
    pub fn is_protected(&self, branch: &str) -> bool {
        self.protected.iter().any(|p| p == branch)
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Extracts merged branch names from `git branch --merged` output
    ///
    /// Drops the `* ` (current branch) and `+ ` (checked out elsewhere)
    /// markers, blank lines and protected names.
    pub fn parse_merged_branches(&self, raw: &str) -> Vec<String> {
        raw.lines()
            .map(|line| {
                let line = line.trim();
                line.strip_prefix(GIT_CURRENT_BRANCH_MARKER)
                    .or_else(|| line.strip_prefix(GIT_OTHER_WORKTREE_MARKER))
                    .unwrap_or(line)
                    .trim()
            })
            .filter(|name| !name.is_empty() && !self.is_protected(name))
            .map(str::to_string)
            .collect()
    }

    /// Branches merged into the first merge base whose query succeeds
    ///
    /// Results of different bases are never combined.
    pub fn merged_branches<G: GitInterface + ?Sized>(&self, git: &G) -> Result<Vec<String>> {
        for base in &self.merge_bases {
            let base_ref = format!("{}/{}", self.remote, base);
            match git.merged_branches(&base_ref) {
                Ok(raw) => return Ok(self.parse_merged_branches(&raw)),
                Err(e) => debug!(%base_ref, error = %e, "merge base unavailable"),
            }
        }

        Err(GiwoError::NoMergeBase {
            candidates: self.merge_bases.clone(),
        })
    }
}
