//! Git collaborator abstraction
//!
//! Every read and write giwo performs against the repository goes through
//! the [`GitInterface`] trait. Text-returning calls hand back git's raw
//! stdout; parsing happens in [`crate::worktree`] and [`crate::core`] so
//! that it can be exercised against canned output.
//!
//! - [`RealGit`] shells out to the `git` binary (and uses `git2` for
//!   repository discovery).
//! - [`FakeGit`] serves scripted responses and records mutating calls.

use std::path::{Path, PathBuf};

use crate::error::Result;

pub mod fake_git;
pub mod real_git;

pub use fake_git::{FakeGit, GitCall};
pub use real_git::RealGit;

/// Synchronous, blocking access to the version-control tool
#[cfg_attr(test, mockall::automock)]
pub trait GitInterface {
    /// Root of the primary working directory
    fn repository_root(&self) -> Result<PathBuf>;

    /// Raw `git worktree list --porcelain` output
    fn list_worktrees(&self) -> Result<String>;

    /// Raw `git status --porcelain` output, run inside `worktree`
    fn status(&self, worktree: &Path) -> Result<String>;

    /// Raw `<subject>|<unix-timestamp>` of the newest commit in `worktree`
    fn last_commit(&self, worktree: &Path) -> Result<String>;

    /// Raw `<behind>\t<ahead>` counts of `upstream...local`, run inside `worktree`
    fn divergence(&self, worktree: &Path, upstream: &str, local: &str) -> Result<String>;

    /// Raw `git branch --merged <base_ref>` output
    fn merged_branches(&self, base_ref: &str) -> Result<String>;

    /// Name of the branch checked out in the primary worktree
    fn current_branch(&self) -> Result<String>;

    /// Default branch advertised by `remote` (its `HEAD`)
    fn default_branch(&self, remote: &str) -> Result<String>;

    /// URL of `remote`
    fn remote_url(&self, remote: &str) -> Result<String>;

    /// `git fetch --prune`
    fn fetch(&self) -> Result<()>;

    /// `git worktree add -b <branch> <path> <start_point>`
    fn add_worktree(&self, branch: &str, path: &Path, start_point: &str) -> Result<()>;

    /// `git worktree remove [--force] <path>`
    fn remove_worktree(&self, path: &Path, force: bool) -> Result<()>;

    /// `git branch -D <name>`
    fn delete_branch(&self, name: &str) -> Result<()>;

    /// `git worktree prune -v`, returning its report
    fn prune(&self) -> Result<String>;
}
