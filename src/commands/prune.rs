use anyhow::{Context, Result};

use crate::constants::{ICON_BROOM, ICON_CLEAN};
use crate::git_interface::GitInterface;
use crate::manager::WorktreeManager;

/// Removes administrative files of worktrees whose directory is gone
pub fn prune_worktrees() -> Result<()> {
    let manager = WorktreeManager::discover()?;
    println!("{ICON_BROOM} Pruning orphaned worktree administrative files...");
    println!("{}", prune_output(&manager)?);
    Ok(())
}

pub fn prune_output<G: GitInterface>(manager: &WorktreeManager<G>) -> Result<String> {
    let output = manager.prune().context("failed to prune worktrees")?;
    let output = output.trim_end();
    if output.is_empty() {
        Ok(format!("{ICON_CLEAN} No orphaned administrative files found"))
    } else {
        Ok(output.to_string())
    }
}
