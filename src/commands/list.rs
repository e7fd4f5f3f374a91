use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::constants::{ICON_CLEAN, ICON_DIRTY, ICON_LINKED, ICON_PRIMARY, LAST_COMMIT_MAX_WIDTH, MSG_NO_WORKTREES};
use crate::git_interface::GitInterface;
use crate::manager::WorktreeManager;
use crate::utils::{render_table, truncate};
use crate::worktree::WorktreeRecord;

/// Output format of `giwo list`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    #[default]
    Table,
    /// `branch<TAB>path`, one worktree per line
    Simple,
    /// Pretty-printed JSON array
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub verbose: bool,
    pub format: ListFormat,
}

/// Lists all worktrees on stdout
pub fn list_worktrees(options: &ListOptions) -> Result<()> {
    let manager = WorktreeManager::discover()?;
    let output = list_worktrees_output(&manager, options)?;
    println!("{output}");
    Ok(())
}

/// Internal implementation of list_worktrees with dependency injection
pub fn list_worktrees_output<G: GitInterface>(
    manager: &WorktreeManager<G>,
    options: &ListOptions,
) -> Result<String> {
    let records = manager.list().context("failed to list worktrees")?;
    render_listing(&records, options)
}

pub fn render_listing(records: &[WorktreeRecord], options: &ListOptions) -> Result<String> {
    if records.is_empty() {
        return Ok(MSG_NO_WORKTREES.to_string());
    }

    let output = match options.format {
        ListFormat::Json => serde_json::to_string_pretty(records)?,
        ListFormat::Simple => render_simple(records),
        ListFormat::Table if options.verbose => render_verbose_table(records),
        ListFormat::Table => render_table_compact(records),
    };
    Ok(output)
}

pub fn render_simple(records: &[WorktreeRecord]) -> String {
    records
        .iter()
        .map(|r| format!("{}\t{}", r.branch, r.path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn compact_status(record: &WorktreeRecord) -> String {
    if record.is_primary {
        format!("{ICON_PRIMARY} main")
    } else if !record.is_clean {
        format!("{ICON_DIRTY}  dirty")
    } else {
        format!("{ICON_CLEAN} clean")
    }
}

pub fn render_table_compact(records: &[WorktreeRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| vec![r.branch.clone(), r.path.display().to_string(), compact_status(r)])
        .collect();
    render_table(&["BRANCH", "PATH", "STATUS"], &rows)
}

fn status_icon(record: &WorktreeRecord) -> &'static str {
    if record.is_primary {
        ICON_PRIMARY
    } else if !record.is_clean {
        ICON_DIRTY
    } else {
        ICON_LINKED
    }
}

/// `+ahead/-behind`, or `up-to-date` when both are zero
pub fn format_divergence(record: &WorktreeRecord) -> String {
    if record.is_up_to_date() {
        "up-to-date".to_string()
    } else {
        format!("+{}/-{}", record.ahead, record.behind)
    }
}

/// `M:x A:y D:z`, or `clean`
pub fn format_changes(record: &WorktreeRecord) -> String {
    if record.is_clean {
        "clean".to_string()
    } else {
        format!("M:{} A:{} D:{}", record.modified, record.added, record.deleted)
    }
}

pub fn render_verbose_table(records: &[WorktreeRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.branch.clone(),
                r.path.display().to_string(),
                status_icon(r).to_string(),
                format_divergence(r),
                format_changes(r),
                truncate(&r.last_commit, LAST_COMMIT_MAX_WIDTH),
                r.commit_age.clone(),
            ]
        })
        .collect();
    render_table(
        &["BRANCH", "PATH", "STATUS", "AHEAD/BEHIND", "CHANGES", "LAST COMMIT", "AGE"],
        &rows,
    )
}
