use anyhow::{Context, Result};
use colored::*;
use tracing::debug;

use crate::constants::{
    section_header, ICON_BROOM, ICON_CLEAN, ICON_DIRTY, ICON_HINT, ICON_REMOTE, ICON_STATS,
};
use crate::git_interface::GitInterface;
use crate::manager::{RemoteRepository, WorktreeManager};
use crate::worktree::Stats;

/// Everything `giwo status` reports, gathered before rendering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub stats: Stats,
    /// `None` when no merge base could be queried
    pub merged: Option<Vec<String>>,
    pub repository: Option<RemoteRepository>,
    pub current_branch: Option<String>,
}

/// Shows worktree statistics and suggested actions
pub fn show_status() -> Result<()> {
    let manager = WorktreeManager::discover()?;
    let report = collect_status(&manager)?;
    println!("{}", render_status(&report));
    Ok(())
}

/// Gathers the report; only the listing itself is allowed to fail
pub fn collect_status<G: GitInterface>(manager: &WorktreeManager<G>) -> Result<StatusReport> {
    let records = manager.list().context("failed to list worktrees")?;

    let merged = match manager.merged_branches() {
        Ok(branches) => Some(branches),
        Err(e) => {
            debug!(error = %e, "merged branches unavailable");
            None
        }
    };
    let repository = manager.remote_repository().ok().flatten();
    let current_branch = manager.current_branch().ok();

    Ok(StatusReport {
        stats: Stats::from_records(&records),
        merged,
        repository,
        current_branch,
    })
}

pub fn render_status(report: &StatusReport) -> String {
    let stats = &report.stats;
    let mut lines = vec![section_header(&format!("{ICON_STATS} Worktree Statistics"))];

    if let Some(repository) = &report.repository {
        lines.push(format!(
            "  {ICON_REMOTE} Repository: {}",
            repository.to_string().bright_cyan()
        ));
    }
    if let Some(branch) = &report.current_branch {
        lines.push(format!("  Current branch: {}", branch.yellow()));
    }
    lines.push(format!("  Total worktrees: {}", stats.total));
    lines.push(format!("  Active worktrees: {}", stats.active));
    lines.push(format!("  Dirty worktrees: {}", stats.dirty));
    let main_state = if stats.main_exists {
        format!("{ICON_CLEAN} exists")
    } else {
        "❌ missing".to_string()
    };
    lines.push(format!("  Main worktree: {main_state}"));

    if stats.dirty > 0 {
        lines.push(String::new());
        lines.push(
            format!("{ICON_DIRTY}  {} worktree(s) have uncommitted changes", stats.dirty)
                .yellow()
                .to_string(),
        );
    }

    if let Some(merged) = report.merged.as_ref().filter(|m| !m.is_empty()) {
        lines.push(String::new());
        lines.push(format!(
            "{ICON_BROOM} {} merged branch(es) can be cleaned up:",
            merged.len()
        ));
        for branch in merged {
            lines.push(format!("  - {branch}"));
        }
        lines.push(String::new());
        lines.push(format!(
            "{ICON_HINT} Run 'giwo clean' to remove worktrees of merged branches"
        ));
    }

    if stats.total == 1 && stats.main_exists {
        lines.push(String::new());
        lines.push(format!(
            "{ICON_HINT} Run 'giwo create <branch-name>' to create your first worktree"
        ));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::git_interface::FakeGit;

    fn plain(text: &str) -> String {
        console::strip_ansi_codes(text).to_string()
    }

    #[test]
    fn test_first_worktree_hint() {
        let manager = WorktreeManager::new(FakeGit::new("/repo"), Config::default()).unwrap();
        let report = collect_status(&manager).unwrap();

        assert_eq!(report.stats.total, 1);
        assert!(report.stats.main_exists);
        assert_eq!(report.merged, None);
        assert_eq!(report.current_branch.as_deref(), Some("main"));

        let output = plain(&render_status(&report));
        assert!(output.contains("Main worktree: ✅ exists"));
        assert!(output.contains("to create your first worktree"));
        assert!(!output.contains("merged branch(es)"));
    }

    #[test]
    fn test_dirty_and_merged_sections() {
        let manager = WorktreeManager::new(
            FakeGit::new("/repo")
                .with_worktree("/repo/.worktree/done", "done")
                .with_worktree("/repo/.worktree/wip", "wip")
                .with_status("/repo/.worktree/wip", "?? new.txt\n")
                .with_merged("origin/main", "* main\n  done\n")
                .with_remote_url("git@github.com:acme/tool.git"),
            Config::default(),
        )
        .unwrap();
        let report = collect_status(&manager).unwrap();
        assert_eq!(report.stats.active, 2);
        assert_eq!(report.stats.dirty, 1);

        let output = plain(&render_status(&report));
        assert!(output.contains("Repository: acme/tool"));
        assert!(output.contains("1 worktree(s) have uncommitted changes"));
        assert!(output.contains("1 merged branch(es) can be cleaned up:\n  - done"));
        assert!(output.contains("Run 'giwo clean'"));
        assert!(!output.contains("first worktree"));
    }

    #[test]
    fn test_missing_main_worktree() {
        let report = StatusReport::default();
        let output = plain(&render_status(&report));
        assert!(output.contains("Main worktree: ❌ missing"));
    }

    #[test]
    fn test_listing_failure_is_an_error() {
        let manager = WorktreeManager::new(
            FakeGit::new("/repo").with_failing_listing("fatal: broken"),
            Config::default(),
        )
        .unwrap();
        assert!(collect_status(&manager).is_err());
    }
}
