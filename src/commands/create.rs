use anyhow::{Context, Result};
use colored::*;

use crate::constants::{ICON_CLEAN, ICON_DIRTY, ICON_FOLDER, ICON_HINT, ICON_LINKED};
use crate::core::validate_branch_name;
use crate::file_copy::CopyReport;
use crate::git_interface::GitInterface;
use crate::manager::{CreateOutcome, CreateRequest, WorktreeManager};
use crate::ui::{TerminalUI, UserInterface};
use crate::utils;

#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    pub branch: String,
    /// Base branch; defaults to the current branch
    pub base: Option<String>,
    /// Create even if the target directory already exists
    pub force: bool,
}

/// Creates a worktree on a new branch under the worktree directory
pub fn create_worktree(options: &CreateOptions) -> Result<()> {
    let manager = WorktreeManager::discover()?;
    let ui = TerminalUI::new();
    create_worktree_with_ui(&manager, &ui, options)?;
    Ok(())
}

/// Internal implementation of create_worktree with dependency injection
pub fn create_worktree_with_ui<G: GitInterface>(
    manager: &WorktreeManager<G>,
    ui: &dyn UserInterface,
    options: &CreateOptions,
) -> Result<CreateOutcome> {
    validate_branch_name(&options.branch)?;

    let base = manager.resolve_base_branch(options.base.as_deref());
    ui.show(&format!(
        "{ICON_LINKED} Creating worktree '{}' based on '{}'...",
        options.branch.bright_white().bold(),
        base.yellow()
    ));

    let request = CreateRequest {
        branch: options.branch.clone(),
        base: Some(base),
        force: options.force,
    };

    let pb = utils::spinner("Fetching and creating worktree...");
    let result = manager.create(&request);
    pb.finish_and_clear();
    let outcome = result.with_context(|| format!("failed to create worktree '{}'", options.branch))?;

    let path = outcome.path.display().to_string();
    ui.show(&format!(
        "{ICON_CLEAN} Worktree created successfully at: {}",
        path.bright_cyan()
    ));
    for line in describe_copy(&outcome.copy) {
        ui.show(&line);
    }
    ui.show(&format!("{ICON_HINT} Run 'cd {path}' to switch to the new worktree"));

    Ok(outcome)
}

/// Summary lines for the best-effort file copy
pub fn describe_copy(report: &CopyReport) -> Vec<String> {
    let mut lines = Vec::new();

    if report.copied_count() > 0 {
        lines.push(format!("{ICON_FOLDER} Copied {} file(s):", report.copied_count()));
        for (name, count) in &report.copied {
            if *count > 1 {
                lines.push(format!("  ✓ {name} ({count} files)"));
            } else {
                lines.push(format!("  ✓ {name}"));
            }
        }
    }
    for name in &report.skipped {
        lines.push(format!("{ICON_DIRTY}  Skipped '{name}'").yellow().to_string());
    }
    for (name, reason) in &report.failed {
        lines.push(
            format!("{ICON_DIRTY}  Failed to copy '{name}': {reason}")
                .yellow()
                .to_string(),
        );
    }

    lines
}
