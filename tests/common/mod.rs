//! Test repository setup utilities
//!
//! Builds a real repository with a bare `origin` next to it, so that
//! `fetch` and `origin/<branch>` start points work like in a clone.

#![allow(dead_code)]

use anyhow::{bail, Result};
use git2::{BranchType, Repository};
use giwo::config::Config;
use giwo::git_interface::RealGit;
use giwo::manager::WorktreeManager;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Runs git in `dir` and returns stdout
pub fn git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).current_dir(dir).output()?;
    if !output.status.success() {
        bail!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// A working clone plus its bare origin, both inside one temp dir
pub struct TestRepo {
    _temp_dir: TempDir,
    root: PathBuf,
    origin: PathBuf,
}

impl TestRepo {
    /// Create a repository on `main` with one commit pushed to origin
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base = temp_dir.path().canonicalize()?;
        let origin = base.join("origin.git");
        let root = base.join("project");

        fs::create_dir_all(&origin)?;
        git(&origin, &["init", "--bare", "-b", "main"])?;

        fs::create_dir_all(&root)?;
        git(&root, &["init", "-b", "main"])?;
        git(&root, &["config", "user.email", "test@example.com"])?;
        git(&root, &["config", "user.name", "Test User"])?;

        fs::write(root.join("README.md"), "# Test Project\n")?;
        fs::write(root.join(".gitignore"), ".worktree/\n.env\n")?;
        git(&root, &["add", "."])?;
        git(&root, &["commit", "-m", "Initial commit"])?;

        let origin_url = origin.to_string_lossy().into_owned();
        git(&root, &["remote", "add", "origin", &origin_url])?;
        git(&root, &["push", "-u", "origin", "main"])?;
        git(&root, &["remote", "set-head", "origin", "main"])?;

        Ok(Self {
            _temp_dir: temp_dir,
            root,
            origin,
        })
    }

    /// Primary worktree directory
    pub fn path(&self) -> &Path {
        &self.root
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn git(&self, args: &[&str]) -> Result<String> {
        git(&self.root, args)
    }

    /// Manager over this repository with the configuration found on disk
    pub fn manager(&self) -> Result<WorktreeManager<RealGit>> {
        let git = RealGit::discover(&self.root)?;
        let config = Config::load_from_root(&self.root)?;
        Ok(WorktreeManager::new(git, config)?)
    }

    /// Commit a file in `dir` (any worktree of this repository)
    pub fn commit_file(&self, dir: &Path, name: &str, content: &str, message: &str) -> Result<()> {
        fs::write(dir.join(name), content)?;
        git(dir, &["add", name])?;
        git(dir, &["commit", "-m", message])?;
        Ok(())
    }

    pub fn write_config(&self, content: &str) -> Result<()> {
        fs::write(Config::path_for_root(&self.root), content)?;
        Ok(())
    }

    /// Whether a local branch exists, checked through libgit2
    pub fn has_local_branch(&self, name: &str) -> Result<bool> {
        let repo = Repository::open(&self.root)?;
        let exists = repo.find_branch(name, BranchType::Local).is_ok();
        Ok(exists)
    }
}
