//! Error types for giwo
//!
//! The library layers (`core`, `worktree`, `manager`, `git_interface`) return
//! [`GiwoError`] so callers can tell a validation failure from a failed git
//! invocation. Command handlers wrap these in `anyhow` with extra context.
//!
//! Cancellation (quit keystroke, declined confirmation) is deliberately not an
//! error: it is modelled as a value by the selection engine and the commands.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the library layers
pub type Result<T> = std::result::Result<T, GiwoError>;

/// Everything that can go wrong inside giwo
#[derive(Debug, Error)]
pub enum GiwoError {
    /// No repository could be discovered from the starting directory
    #[error("not in a git repository: {}", path.display())]
    NotARepository { path: PathBuf },

    /// A branch name failed validation
    #[error("invalid branch name '{name}': {reason}")]
    InvalidBranchName { name: String, reason: &'static str },

    /// The target worktree directory is already present
    #[error("worktree already exists: {}", .0.display())]
    WorktreeExists(PathBuf),

    /// No registered worktree matches the given branch
    #[error("worktree not found for branch '{0}'")]
    WorktreeNotFound(String),

    /// The primary working copy can never be removed by giwo
    #[error("refusing to remove the primary worktree at {}", .0.display())]
    PrimaryWorktree(PathBuf),

    /// A git subprocess exited with a failure status
    #[error("git {operation} failed: {stderr}")]
    Git {
        operation: String,
        args: Vec<String>,
        stderr: String,
    },

    /// None of the merge-base candidates could be queried
    #[error("failed to determine merged branches: none of {} found", candidates.join("/"))]
    NoMergeBase { candidates: Vec<String> },

    /// The listing is empty so there is nothing to select
    #[error("no worktrees available")]
    NoWorktrees,

    /// A filter matched no worktree
    #[error("no worktrees match filter: {filter}")]
    NoMatches { filter: String },

    /// The user typed something that is neither a number nor a quit signal
    #[error("invalid selection: {input}")]
    InvalidSelection { input: String },

    /// The user typed a number outside `[1, max]`
    #[error("selection out of range: {index} (range: 1-{max})")]
    SelectionOutOfRange { index: usize, max: usize },

    /// The configuration file could not be parsed
    #[error("invalid configuration in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GiwoError {
    /// Builds a [`GiwoError::Git`] from the argument vector of a failed call
    ///
    /// The first argument is treated as the operation name, the rest as its
    /// arguments, so `["worktree", "list", "--porcelain"]` reports
    /// `git worktree failed`.
    pub fn git(args: &[&str], stderr: impl Into<String>) -> Self {
        let (operation, rest) = match args.split_first() {
            Some((op, rest)) => (op.to_string(), rest),
            None => (String::new(), &[][..]),
        };
        GiwoError::Git {
            operation,
            args: rest.iter().map(|a| a.to_string()).collect(),
            stderr: stderr.into().trim().to_string(),
        }
    }

    /// Whether this error represents a failed validation step
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GiwoError::InvalidBranchName { .. }
                | GiwoError::InvalidSelection { .. }
                | GiwoError::SelectionOutOfRange { .. }
        )
    }
}
