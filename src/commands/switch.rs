use anyhow::{Context, Result};
use colored::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

use crate::constants::{
    DEFAULT_SHELL, ENV_SHELL, ICON_DIRTY, ICON_HINT, ICON_SHELL, ICON_SWITCH, MSG_OPERATION_CANCELLED,
};
use crate::core::{FuzzyFinder, Selection, Selector};
use crate::git_interface::GitInterface;
use crate::manager::WorktreeManager;
use crate::ui::{TerminalUI, UserInterface};
use crate::utils::{self, write_switch_path};
use crate::worktree::WorktreeRecord;

/// How the worktree gets picked
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// Numbered list, narrowed by the filter when one is given
    #[default]
    Numbered,
    /// Incremental search loop
    Fuzzy,
    /// Terminal fuzzy-select widget
    Picker,
}

#[derive(Debug, Clone, Default)]
pub struct SwitchOptions {
    pub filter: Option<String>,
    pub mode: SelectionMode,
    /// Print the path on stdout instead of switching
    pub print: bool,
    /// Shell-wrapper file that receives the target path
    pub switch_file: Option<PathBuf>,
}

/// Where the chosen path ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Print,
    AlreadyThere,
    SwitchFile(PathBuf),
    Subshell,
}

/// What `switch` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    Cancelled,
    /// No worktrees to choose from
    Empty,
    Delivered { path: PathBuf, delivery: Delivery },
}

/// Decides how to hand `target` to the user
pub fn plan_delivery(options: &SwitchOptions, target: &WorktreeRecord, cwd: Option<&Path>) -> Delivery {
    if options.print {
        return Delivery::Print;
    }
    if cwd.is_some_and(|dir| target.is_at(dir)) {
        return Delivery::AlreadyThere;
    }
    match &options.switch_file {
        Some(file) => Delivery::SwitchFile(file.clone()),
        None => Delivery::Subshell,
    }
}

/// Picks a worktree and moves the user there
pub fn switch_worktree(options: &SwitchOptions) -> Result<()> {
    let manager = WorktreeManager::discover()?;
    let ui = TerminalUI::new();
    let outcome = switch_worktree_with_ui(&manager, &ui, options)?;

    if let SwitchOutcome::Delivered {
        path,
        delivery: Delivery::Subshell,
    } = outcome
    {
        open_shell_in(&ui, &path);
    }
    Ok(())
}

/// Internal implementation of switch_worktree with dependency injection
///
/// Everything except spawning the subshell happens here; the subshell is
/// left to the caller so tests never start one.
pub fn switch_worktree_with_ui<G: GitInterface>(
    manager: &WorktreeManager<G>,
    ui: &dyn UserInterface,
    options: &SwitchOptions,
) -> Result<SwitchOutcome> {
    let records = manager.list().context("failed to list worktrees")?;
    if records.is_empty() {
        ui.show("No worktrees found. Use 'giwo create <branch-name>' to create one.");
        return Ok(SwitchOutcome::Empty);
    }

    let selection = select(&records, ui, options).context("selection failed")?;
    let target = match selection {
        Selection::Chosen(record) => record,
        Selection::Cancelled => {
            ui.show(MSG_OPERATION_CANCELLED);
            return Ok(SwitchOutcome::Cancelled);
        }
    };

    let cwd = std::env::current_dir().ok();
    let delivery = plan_delivery(options, target, cwd.as_deref());
    debug!(branch = %target.branch, ?delivery, "switch target chosen");

    match &delivery {
        Delivery::Print => println!("{}", target.path.display()),
        Delivery::AlreadyThere => {
            ui.show(&format!("Already in worktree '{}'", target.branch));
        }
        Delivery::SwitchFile(file) => {
            write_switch_path(file, &target.path)
                .with_context(|| format!("failed to write switch file {}", file.display()))?;
            ui.show(&format!(
                "{ICON_SWITCH} Switching to worktree '{}' at {}",
                target.branch.bright_white().bold(),
                target.path.display()
            ));
        }
        Delivery::Subshell => {
            ui.show(&format!(
                "{ICON_SWITCH} Switching to worktree '{}' at {}",
                target.branch.bright_white().bold(),
                target.path.display()
            ));
            ui.show(&format!("{ICON_HINT} Run: cd {}", target.path.display()));
        }
    }

    Ok(SwitchOutcome::Delivered {
        path: target.path.clone(),
        delivery,
    })
}

fn select<'a>(
    records: &'a [WorktreeRecord],
    ui: &dyn UserInterface,
    options: &SwitchOptions,
) -> crate::error::Result<Selection<'a>> {
    let filter = options.filter.as_deref().map(str::trim).filter(|f| !f.is_empty());

    match (options.mode, filter) {
        (SelectionMode::Fuzzy, _) => FuzzyFinder::new(records).run(ui),
        (SelectionMode::Picker, _) => Selector::new(records).select_with_picker(ui),
        (SelectionMode::Numbered, Some(filter)) => Selector::new(records).select_with_filter(ui, filter),
        (SelectionMode::Numbered, None) => Selector::new(records).select(ui),
    }
}

/// Opens `$SHELL` in `path`; returns when the user exits it
fn open_shell_in(ui: &dyn UserInterface, path: &Path) {
    let shell = std::env::var(ENV_SHELL)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SHELL.to_string());

    ui.show(&format!(
        "{ICON_SHELL} Opening new shell in {} (exit to return)",
        path.display()
    ));
    if let Err(e) = Command::new(&shell).current_dir(path).status() {
        utils::print_warning(&format!("Could not open new shell: {e}"));
        ui.show(&format!("{ICON_DIRTY}  You can also copy and run: cd {}", path.display()));
    }
}
