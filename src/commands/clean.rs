use anyhow::{Context, Result};
use colored::*;

use crate::constants::{ICON_BROOM, ICON_CLEAN, ICON_DIRTY, ICON_HINT, ICON_TRASH, MSG_OPERATION_CANCELLED};
use crate::git_interface::GitInterface;
use crate::manager::{select_merged, WorktreeManager};
use crate::ui::{TerminalUI, UserInterface};

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    /// Only list what would be removed
    pub dry_run: bool,
    /// Skip the confirmation prompt
    pub force: bool,
}

/// What a clean run ended with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanSummary {
    /// Branches whose worktrees were removed
    pub removed: Vec<String>,
    /// Branches whose removal failed, with the reason
    pub failed: Vec<(String, String)>,
    pub cancelled: bool,
}

/// Removes the worktrees of branches merged into a merge base
pub fn clean_worktrees(options: &CleanOptions) -> Result<()> {
    let manager = WorktreeManager::discover()?;
    let ui = TerminalUI::new();
    clean_worktrees_with_ui(&manager, &ui, options)?;
    Ok(())
}

/// Internal implementation of clean_worktrees with dependency injection
///
/// A failure on one worktree is reported and the loop moves on to the next.
pub fn clean_worktrees_with_ui<G: GitInterface>(
    manager: &WorktreeManager<G>,
    ui: &dyn UserInterface,
    options: &CleanOptions,
) -> Result<CleanSummary> {
    let mut summary = CleanSummary::default();

    let merged = manager
        .merged_branches()
        .context("failed to get merged branches")?;
    if merged.is_empty() {
        ui.show(&format!("{ICON_BROOM} No merged branches found to clean up"));
        return Ok(summary);
    }

    let records = manager.list().context("failed to list worktrees")?;
    let targets = select_merged(&records, &merged);
    if targets.is_empty() {
        ui.show(&format!("{ICON_BROOM} No worktrees found for merged branches"));
        return Ok(summary);
    }

    ui.show(&format!(
        "{ICON_BROOM} Found {} worktree(s) for merged branches:",
        targets.len()
    ));
    for record in &targets {
        let state = if record.is_clean {
            "clean".to_string()
        } else {
            format!("{ICON_DIRTY}  dirty").yellow().to_string()
        };
        ui.show(&format!("  - {} ({state})", record.branch));
    }

    if options.dry_run {
        ui.show("");
        ui.show(&format!(
            "{ICON_HINT} Run without --dry-run to actually remove these worktrees"
        ));
        return Ok(summary);
    }

    if !options.force {
        ui.show("");
        let prompt = format!("Remove {} worktree(s)?", targets.len());
        if !ui.confirm(&prompt, false)? {
            ui.show(MSG_OPERATION_CANCELLED);
            summary.cancelled = true;
            return Ok(summary);
        }
    }

    for record in targets {
        ui.show(&format!("{ICON_TRASH}  Removing worktree '{}'...", record.branch));
        match manager.remove(&record.branch, false) {
            Ok(report) => {
                if let Some(warning) = report.branch_warning {
                    ui.show(&format!("{ICON_DIRTY}  Branch '{}' kept: {warning}", record.branch));
                }
                summary.removed.push(record.branch.clone());
            }
            Err(e) => {
                ui.show(
                    &format!("{ICON_DIRTY}  Failed to remove '{}': {e}", record.branch)
                        .yellow()
                        .to_string(),
                );
                summary.failed.push((record.branch.clone(), e.to_string()));
            }
        }
    }

    ui.show(&format!(
        "{ICON_CLEAN} Successfully removed {} worktree(s)",
        summary.removed.len()
    ));
    Ok(summary)
}
