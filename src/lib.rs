//! giwo - Git worktree manager
//!
//! giwo keeps one working copy per branch under `<repo>/.worktree/<branch>`
//! and manages their lifecycle from the command line: creating a worktree
//! from a fresh remote base, listing worktrees with their status, picking
//! one interactively to switch to, and removing the worktrees of branches
//! that have already been merged.
//!
//! # Architecture
//!
//! - [`worktree`] - Worktree records and the porcelain listing parser
//! - [`core`] - Branch-name rules, status enrichment, branch policy, selection
//! - [`git_interface`] - The git collaborator trait, its subprocess implementation and a fake
//! - [`manager`] - Facade composing the above into repository operations
//! - [`commands`] - Subcommand implementations
//! - [`config`] - Optional `.giwo.toml` at the repository root
//! - [`ui`] - Prompt abstraction for interactive commands
//! - [`file_copy`] / [`filesystem`] - Copying untracked dotfiles into new worktrees
//! - [`utils`] - Terminal output helpers
//!
//! # Usage Example
//!
//! ```no_run
//! use giwo::manager::WorktreeManager;
//!
//! let manager = WorktreeManager::discover().expect("not inside a git repository");
//! for record in manager.list().expect("failed to list worktrees") {
//!     println!("{}\t{}", record.branch, record.path.display());
//! }
//! ```

pub mod commands;
pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod file_copy;
pub mod filesystem;
pub mod git_interface;
pub mod manager;
pub mod ui;
pub mod utils;
pub mod worktree;

pub use error::{GiwoError, Result};
