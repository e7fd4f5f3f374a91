//! Worktree lifecycle against real git repositories
//!
//! Each test builds its own clone with a bare origin, so nothing here
//! depends on the machine's repositories or network.

mod common;

use anyhow::Result;
use giwo::commands::{clean_worktrees_with_ui, collect_status, CleanOptions};
use giwo::error::GiwoError;
use giwo::manager::{CreateRequest, WorktreeManager};
use giwo::ui::MockUI;
use serial_test::serial;
use std::fs;

use common::{git, TestRepo};

#[test]
fn test_create_list_remove() -> Result<()> {
    let repo = TestRepo::new()?;
    fs::write(repo.path().join(".env"), "TOKEN=abc")?;
    let manager = repo.manager()?;

    let outcome = manager.create(&CreateRequest::new("feature-a"))?;
    assert_eq!(outcome.path, repo.path().join(".worktree/feature-a"));
    assert_eq!(outcome.start_point, "origin/main");
    assert!(outcome.path.join("README.md").exists());
    assert_eq!(fs::read_to_string(outcome.path.join(".env"))?, "TOKEN=abc");
    assert!(outcome.copy.missing.contains(&".env.local".to_string()));

    let records = manager.list()?;
    assert_eq!(records.len(), 2);
    assert!(records[0].is_primary);
    assert_eq!(records[0].branch, "main");
    assert!(records[0].is_clean);
    assert_eq!(records[1].branch, "feature-a");
    assert!(!records[1].is_primary);
    assert_eq!(records[1].last_commit, "Initial commit");
    assert!(records[1].commit_time.is_some());
    assert!(records[1].is_up_to_date());

    let report = manager.remove("feature-a", false)?;
    assert!(!report.forced);
    assert!(report.branch_deleted);
    assert!(!outcome.path.exists());
    assert!(!repo.has_local_branch("feature-a")?);
    assert_eq!(manager.list()?.len(), 1);
    Ok(())
}

#[test]
fn test_dirty_worktree_is_counted_and_force_removed() -> Result<()> {
    let repo = TestRepo::new()?;
    let manager = repo.manager()?;
    let path = manager.create(&CreateRequest::new("scratch"))?.path;

    fs::write(path.join("notes.txt"), "draft")?;
    fs::write(path.join("README.md"), "# Changed\n")?;

    let records = manager.list()?;
    let scratch = records.iter().find(|r| r.branch == "scratch").unwrap();
    assert!(!scratch.is_clean);
    assert_eq!(scratch.added, 1);
    assert_eq!(scratch.modified, 1);
    assert_eq!(scratch.change_count(), 2);

    let report = manager.remove("scratch", true)?;
    assert!(report.forced);
    assert!(!report.branch_deleted);
    assert!(repo.has_local_branch("scratch")?);
    Ok(())
}

#[test]
fn test_ahead_of_upstream() -> Result<()> {
    let repo = TestRepo::new()?;
    let manager = repo.manager()?;
    let path = manager.create(&CreateRequest::new("topic"))?.path;

    repo.commit_file(&path, "a.txt", "a", "Add a")?;
    git(&path, &["push", "-u", "origin", "topic"])?;
    repo.commit_file(&path, "b.txt", "b", "Add b | with pipe")?;

    let records = manager.list()?;
    let topic = records.iter().find(|r| r.branch == "topic").unwrap();
    assert_eq!(topic.ahead, 1);
    assert_eq!(topic.behind, 0);
    assert_eq!(topic.last_commit, "Add b | with pipe");
    Ok(())
}

#[test]
fn test_create_refusals() -> Result<()> {
    let repo = TestRepo::new()?;
    let manager = repo.manager()?;

    let err = manager.create(&CreateRequest::new("bad name")).unwrap_err();
    assert!(matches!(err, GiwoError::InvalidBranchName { .. }));

    fs::create_dir_all(repo.path().join(".worktree/taken"))?;
    let err = manager.create(&CreateRequest::new("taken")).unwrap_err();
    assert!(matches!(err, GiwoError::WorktreeExists(_)));

    let err = manager.remove("main", false).unwrap_err();
    assert!(matches!(err, GiwoError::PrimaryWorktree(_)));
    Ok(())
}

#[test]
fn test_base_branch_resolution() -> Result<()> {
    let repo = TestRepo::new()?;
    let manager = repo.manager()?;

    assert_eq!(manager.current_branch()?, "main");
    assert_eq!(manager.default_branch()?, "main");
    assert_eq!(manager.resolve_base_branch(None), "main");
    assert_eq!(manager.resolve_base_branch(Some("release")), "release");
    Ok(())
}

#[test]
fn test_clean_removes_only_merged_worktrees() -> Result<()> {
    let repo = TestRepo::new()?;
    let manager = repo.manager()?;

    let done = manager.create(&CreateRequest::new("done"))?.path;
    repo.commit_file(&done, "done.txt", "x", "Finish feature")?;
    repo.git(&["merge", "--ff-only", "done"])?;
    repo.git(&["push", "origin", "main"])?;

    let wip = manager.create(&CreateRequest::new("wip"))?.path;
    repo.commit_file(&wip, "wip.txt", "y", "Work in progress")?;

    assert_eq!(manager.merged_branches()?, vec!["done"]);

    let ui = MockUI::new().with_confirm(true);
    let summary = clean_worktrees_with_ui(&manager, &ui, &CleanOptions::default())?;

    assert_eq!(summary.removed, vec!["done"]);
    assert!(!done.exists());
    assert!(wip.exists());
    assert!(!repo.has_local_branch("done")?);
    assert!(ui.output_contains("Successfully removed 1 worktree(s)"));
    Ok(())
}

#[test]
fn test_merge_base_fallback_to_master() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.git(&["push", "origin", "main:master"])?;
    repo.git(&["update-ref", "-d", "refs/remotes/origin/main"])?;

    let manager = repo.manager()?;
    assert!(manager.merged_branches()?.is_empty());
    Ok(())
}

#[test]
fn test_configured_worktree_dir() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.write_config("[worktree]\ndir = \"trees\"\ncopy_files = []\n")?;
    let manager = repo.manager()?;

    let outcome = manager.create(&CreateRequest::new("elsewhere"))?;
    assert_eq!(outcome.path, repo.path().join("trees/elsewhere"));
    assert_eq!(outcome.copy.copied_count(), 0);
    Ok(())
}

#[test]
fn test_malformed_config_is_an_error() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.write_config("[worktree\n")?;
    assert!(repo.manager().is_err());
    Ok(())
}

#[test]
fn test_prune_after_manual_delete() -> Result<()> {
    let repo = TestRepo::new()?;
    let manager = repo.manager()?;
    let path = manager.create(&CreateRequest::new("orphan"))?.path;

    fs::remove_dir_all(&path)?;
    let output = manager.prune()?;
    assert!(output.contains("orphan"));
    assert!(manager.records()?.iter().all(|r| r.branch != "orphan"));
    Ok(())
}

#[test]
fn test_status_report() -> Result<()> {
    let repo = TestRepo::new()?;
    let manager = repo.manager()?;
    manager.create(&CreateRequest::new("one"))?;

    let report = collect_status(&manager)?;
    assert_eq!(report.stats.total, 2);
    assert_eq!(report.stats.active, 1);
    assert!(report.stats.main_exists);
    assert_eq!(report.current_branch.as_deref(), Some("main"));
    // A local-path origin is not a GitHub remote
    assert_eq!(report.repository, None);
    assert_eq!(report.merged, Some(vec!["one".to_string()]));
    Ok(())
}

#[test]
#[serial]
fn test_discover_from_linked_worktree() -> Result<()> {
    let repo = TestRepo::new()?;
    let path = repo.manager()?.create(&CreateRequest::new("nested"))?.path;

    let original = std::env::current_dir()?;
    std::env::set_current_dir(&path)?;
    let discovered = WorktreeManager::discover();
    std::env::set_current_dir(original)?;

    let manager = discovered?;
    assert_eq!(manager.root(), repo.path());
    assert_eq!(manager.worktree_path("x"), repo.path().join(".worktree/x"));
    Ok(())
}
