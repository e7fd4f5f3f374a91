use anyhow::{Context, Result};
use colored::*;

use crate::constants::{ICON_CLEAN, ICON_TRASH, MSG_OPERATION_CANCELLED};
use crate::git_interface::GitInterface;
use crate::manager::{RemoveReport, WorktreeManager};
use crate::ui::{TerminalUI, UserInterface};
use crate::utils;

#[derive(Debug, Clone, Default)]
pub struct RemoveOptions {
    pub branch: String,
    /// Skip the confirmation prompt
    pub force: bool,
    pub keep_branch: bool,
}

/// Removes a worktree and, unless kept, its local branch
pub fn remove_worktree(options: &RemoveOptions) -> Result<()> {
    let manager = WorktreeManager::discover()?;
    let ui = TerminalUI::new();
    remove_worktree_with_ui(&manager, &ui, options)?;
    Ok(())
}

/// Internal implementation of remove_worktree with dependency injection
///
/// Returns `None` when the user declined the confirmation.
pub fn remove_worktree_with_ui<G: GitInterface>(
    manager: &WorktreeManager<G>,
    ui: &dyn UserInterface,
    options: &RemoveOptions,
) -> Result<Option<RemoveReport>> {
    let branch = options.branch.as_str();

    if !options.force {
        let record = manager.find(branch)?;
        let prompt = format!(
            "Remove worktree '{}' at {}?",
            branch,
            record.path.display()
        );
        if !ui.confirm(&prompt, false)? {
            ui.show(MSG_OPERATION_CANCELLED);
            return Ok(None);
        }
    }

    ui.show(&format!("{ICON_TRASH}  Removing worktree '{branch}'..."));
    let report = manager
        .remove(branch, options.keep_branch)
        .with_context(|| format!("failed to remove worktree '{branch}'"))?;

    if let Some(warning) = &report.branch_warning {
        utils::print_warning(&format!("Failed to delete branch '{branch}': {warning}"));
    }

    let message = if report.branch_deleted {
        "Worktree and branch removed successfully"
    } else {
        "Worktree removed successfully (branch kept)"
    };
    ui.show(&format!("{ICON_CLEAN} {}", message.green()));

    Ok(Some(report))
}
