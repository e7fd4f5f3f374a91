//! Command implementations
//!
//! Each subcommand has an entry point that opens the repository of the
//! current directory, and a `*_with_ui` (or `*_output`) variant taking the
//! manager and the user interface explicitly, which is what tests drive.

mod clean;
mod create;
mod list;
mod prune;
mod remove;
mod shell_init;
mod status;
mod switch;

pub use clean::{clean_worktrees, clean_worktrees_with_ui, CleanOptions, CleanSummary};
pub use create::{create_worktree, create_worktree_with_ui, describe_copy, CreateOptions};
pub use list::{
    format_changes, format_divergence, list_worktrees, list_worktrees_output, render_listing,
    ListFormat, ListOptions,
};
pub use prune::{prune_output, prune_worktrees};
pub use remove::{remove_worktree, remove_worktree_with_ui, RemoveOptions};
pub use shell_init::{print_shell_init, shell_function, Shell};
pub use status::{collect_status, render_status, show_status, StatusReport};
pub use switch::{
    plan_delivery, switch_worktree, switch_worktree_with_ui, Delivery, SelectionMode,
    SwitchOptions, SwitchOutcome,
};
