//! End-to-end tests of the `giwo` binary

mod common;

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use common::TestRepo;

fn giwo() -> Command {
    let mut cmd = Command::cargo_bin("giwo").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("GIWO_SWITCH_FILE");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    giwo()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("switch"))
        .stdout(predicate::str::contains("shell-init"));
}

#[test]
fn test_outside_repository_fails() -> Result<()> {
    let temp_dir = TempDir::new()?;
    giwo()
        .arg("list")
        .current_dir(temp_dir.path())
        .env("GIT_CEILING_DIRECTORIES", temp_dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error: not in a git repository"));
    Ok(())
}

#[test]
fn test_invalid_branch_name_fails() -> Result<()> {
    let repo = TestRepo::new()?;
    giwo()
        .args(["create", "bad..name"])
        .current_dir(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid branch name 'bad..name'"));
    assert!(!repo.path().join(".worktree").exists());
    Ok(())
}

#[test]
fn test_create_then_list_formats() -> Result<()> {
    let repo = TestRepo::new()?;

    giwo()
        .args(["create", "feature-x"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Worktree created successfully"));

    let expected = format!(
        "main\t{}\nfeature-x\t{}\n",
        repo.path().display(),
        repo.path().join(".worktree/feature-x").display()
    );
    giwo()
        .args(["ls", "--format", "simple"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(expected);

    let output = giwo()
        .args(["list", "--format", "json"])
        .current_dir(repo.path())
        .output()?;
    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value[0]["is_main"], true);
    assert_eq!(value[1]["branch"], "feature-x");
    assert_eq!(value[1]["is_clean"], true);

    giwo()
        .args(["list", "-v"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("AHEAD/BEHIND"))
        .stdout(predicate::str::contains("up-to-date"));
    Ok(())
}

#[test]
fn test_switch_print_and_switch_file() -> Result<()> {
    let repo = TestRepo::new()?;
    let worktree = repo.path().join(".worktree/only-one");
    giwo()
        .args(["create", "only-one"])
        .current_dir(repo.path())
        .assert()
        .success();

    giwo()
        .args(["switch", "--print", "only"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(format!("{}\n", worktree.display()));

    let switch_file = repo.path().join("switch-target");
    giwo()
        .args(["sw", "-f", "only-one"])
        .current_dir(repo.path())
        .env("GIWO_SWITCH_FILE", &switch_file)
        .assert()
        .success();
    assert_eq!(fs::read_to_string(&switch_file)?, worktree.display().to_string());
    Ok(())
}

#[test]
fn test_switch_quit_is_not_an_error() -> Result<()> {
    let repo = TestRepo::new()?;
    giwo()
        .args(["create", "a"])
        .current_dir(repo.path())
        .assert()
        .success();

    giwo()
        .args(["switch", "--print"])
        .current_dir(repo.path())
        .write_stdin("q\n")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Operation cancelled."));
    Ok(())
}

#[test]
fn test_remove_with_force() -> Result<()> {
    let repo = TestRepo::new()?;
    giwo()
        .args(["create", "temp"])
        .current_dir(repo.path())
        .assert()
        .success();

    giwo()
        .args(["rm", "temp", "--force"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Worktree and branch removed successfully"));
    assert!(!repo.path().join(".worktree/temp").exists());
    assert!(!repo.has_local_branch("temp")?);

    giwo()
        .args(["remove", "temp", "--force"])
        .current_dir(repo.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("worktree not found for branch 'temp'"));
    Ok(())
}

#[test]
fn test_status_and_clean_dry_run() -> Result<()> {
    let repo = TestRepo::new()?;
    giwo()
        .args(["status"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Total worktrees: 1"))
        .stdout(predicate::str::contains("create your first worktree"));

    giwo()
        .args(["create", "merged-already"])
        .current_dir(repo.path())
        .assert()
        .success();

    giwo()
        .args(["clean", "--dry-run"])
        .current_dir(repo.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("  - merged-already (clean)"))
        .stderr(predicate::str::contains("Run without --dry-run"));
    assert!(repo.path().join(".worktree/merged-already").exists());
    Ok(())
}

#[test]
fn test_prune_reports_nothing_to_do() -> Result<()> {
    let repo = TestRepo::new()?;
    giwo()
        .arg("prune")
        .current_dir(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No orphaned administrative files found"));
    Ok(())
}

#[test]
fn test_shell_init() {
    giwo()
        .args(["shell-init", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GIWO_SWITCH_FILE"));

    giwo().args(["shell-init", "tcsh"]).assert().failure();
}
