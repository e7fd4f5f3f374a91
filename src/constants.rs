//! Constants used throughout the application
//!
//! This module centralizes hardcoded values: git command fragments,
//! default policy values, display limits and user-facing messages.
//!
//! # Organization
//!
//! - **Git Operations**: command names, options and reference prefixes
//! - **Layout**: worktree directory and dotfiles copied into new worktrees
//! - **Policy**: protected branches and merge-base candidates
//! - **Selection**: display caps and prompt texts
//! - **Icons and Messages**: console decoration

use colored::*;

// Git command
pub const GIT_CMD: &str = "git";
pub const GIT_WORKTREE: &str = "worktree";
pub const GIT_BRANCH: &str = "branch";
pub const GIT_STATUS: &str = "status";
pub const GIT_LOG: &str = "log";
pub const GIT_REV_LIST: &str = "rev-list";
pub const GIT_REV_PARSE: &str = "rev-parse";
pub const GIT_SYMBOLIC_REF: &str = "symbolic-ref";
pub const GIT_FETCH: &str = "fetch";

// Git sub-operations and options
pub const GIT_ADD: &str = "add";
pub const GIT_REMOVE: &str = "remove";
pub const GIT_LIST: &str = "list";
pub const GIT_PRUNE: &str = "prune";
pub const GIT_OPT_PORCELAIN: &str = "--porcelain";
pub const GIT_OPT_FORCE: &str = "--force";
pub const GIT_OPT_NEW_BRANCH: &str = "-b";
pub const GIT_OPT_DELETE_FORCE: &str = "-D";
pub const GIT_OPT_MERGED: &str = "--merged";
pub const GIT_OPT_PRUNE: &str = "--prune";
pub const GIT_OPT_VERBOSE: &str = "-v";
pub const GIT_OPT_COUNT: &str = "--count";
pub const GIT_OPT_LEFT_RIGHT: &str = "--left-right";
pub const GIT_OPT_ABBREV_REF: &str = "--abbrev-ref";
pub const GIT_OPT_SHORT: &str = "--short";
pub const GIT_OPT_LAST_ONE: &str = "-1";
pub const GIT_LAST_COMMIT_FORMAT: &str = "--format=%s|%ct";
pub const GIT_HEAD: &str = "HEAD";

// Git references
pub const GIT_REFS_HEADS: &str = "refs/heads/";
pub const GIT_REFS_PREFIX: &str = "refs/";
pub const GIT_DEFAULT_REMOTE: &str = "origin";
pub const GIT_CURRENT_BRANCH_MARKER: &str = "* ";
pub const GIT_OTHER_WORKTREE_MARKER: &str = "+ ";

// Porcelain listing keys
pub const PORCELAIN_WORKTREE: &str = "worktree ";
pub const PORCELAIN_BRANCH: &str = "branch ";
pub const PORCELAIN_HEAD: &str = "HEAD ";

/// Branch value assigned to a worktree that has no symbolic branch
pub const DETACHED_BRANCH: &str = "HEAD";

// Layout
pub const DEFAULT_WORKTREE_DIR: &str = ".worktree";
pub const CONFIG_FILE_NAME: &str = ".giwo.toml";
pub const DEFAULT_COPY_FILES: &[&str] = &[
    ".editorconfig",
    ".env",
    ".env.local",
    ".gitignore",
    ".prettierrc",
    ".rgignore",
];

// Policy
pub const DEFAULT_PROTECTED_BRANCHES: &[&str] = &["main", "master", "develop", "dev"];
pub const DEFAULT_MERGE_BASES: &[&str] = &["main", "master"];
pub const DEFAULT_BASE_BRANCH: &str = "main";

// Branch names
pub const SANITIZE_FALLBACK_NAME: &str = "unnamed-branch";
pub const FORBIDDEN_BRANCH_SEQUENCES: &[&str] = &["..", "~", "^", ":", "?", "*", "[", "\\"];

// Selection
pub const FUZZY_MAX_SHOW: usize = 10;
pub const FUZZY_OVERFLOW_FACTOR: usize = 2;
pub const QUIT_SIGNALS: &[&str] = &["q", "quit"];

// Commit age thresholds (seconds)
pub const SECS_PER_MINUTE: i64 = 60;
pub const SECS_PER_HOUR: i64 = 60 * 60;
pub const SECS_PER_DAY: i64 = 24 * 60 * 60;
pub const AGE_JUST_NOW: &str = "just now";

// Display
pub const LAST_COMMIT_MAX_WIDTH: usize = 50;
pub const TRUNCATION_SUFFIX: &str = "...";
pub const TABLE_COLUMN_GAP: usize = 2;
pub const SEPARATOR_WIDTH: usize = 40;

// Icons
pub const ICON_PRIMARY: &str = "🏠";
pub const ICON_LINKED: &str = "🌱";
pub const ICON_DIRTY: &str = "⚠️";
pub const ICON_CLEAN: &str = "✅";
pub const ICON_REMOTE: &str = "📡";
pub const ICON_FOLDER: &str = "📁";
pub const ICON_SEARCH: &str = "🔍";
pub const ICON_BROOM: &str = "🧹";
pub const ICON_TRASH: &str = "🗑️";
pub const ICON_HINT: &str = "💡";
pub const ICON_STATS: &str = "📊";
pub const ICON_SWITCH: &str = "🔄";
pub const ICON_SHELL: &str = "🐚";

// Environment
pub const ENV_LOG: &str = "GIWO_LOG";
pub const ENV_SWITCH_FILE: &str = "GIWO_SWITCH_FILE";
pub const ENV_SHELL: &str = "SHELL";
pub const DEFAULT_SHELL: &str = "/bin/sh";
pub const DEFAULT_LOG_FILTER: &str = "warn";

// Messages
pub const MSG_NO_WORKTREES: &str = "No worktrees found";
pub const MSG_OPERATION_CANCELLED: &str = "Operation cancelled.";
pub const MSG_FUZZY_HEADER: &str = "Fuzzy search for worktrees (type to filter, Enter to select)";
pub const MSG_FUZZY_HELP: &str = "   Use numbers to select directly, 'q' to quit";
pub const MSG_AVAILABLE_WORKTREES: &str = "📂 Available worktrees:";
pub const PROMPT_PICKER: &str = "Select a worktree (type to search, ESC to cancel)";

/// Creates a section header with title and separator
pub fn section_header(title: &str) -> String {
    let title_formatted = title.bright_cyan().bold();
    let separator = "=".repeat(SEPARATOR_WIDTH).bright_blue();
    format!("{title_formatted}\n{separator}")
}
