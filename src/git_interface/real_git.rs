use git2::Repository;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::debug;

use super::GitInterface;
use crate::constants::{
    GIT_ADD, GIT_BRANCH, GIT_CMD, GIT_FETCH, GIT_HEAD, GIT_LAST_COMMIT_FORMAT, GIT_LIST, GIT_LOG,
    GIT_OPT_ABBREV_REF, GIT_OPT_COUNT, GIT_OPT_DELETE_FORCE, GIT_OPT_FORCE, GIT_OPT_LAST_ONE,
    GIT_OPT_LEFT_RIGHT, GIT_OPT_MERGED, GIT_OPT_NEW_BRANCH, GIT_OPT_PORCELAIN, GIT_OPT_PRUNE,
    GIT_OPT_SHORT, GIT_OPT_VERBOSE, GIT_PRUNE, GIT_REMOVE, GIT_REV_LIST, GIT_REV_PARSE,
    GIT_STATUS, GIT_SYMBOLIC_REF, GIT_WORKTREE,
};
use crate::error::{GiwoError, Result};

/// Implementation of [`GitInterface`] backed by the `git` executable
///
/// Repository discovery and remote lookup use `git2`; everything that
/// `git` already prints in a stable machine format goes through the CLI.
pub struct RealGit {
    repo: Repository,
    root: PathBuf,
}

impl RealGit {
    /// Discovers the repository containing the current directory
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::discover(&cwd)
    }

    /// Discovers the repository containing `start`
    ///
    /// Bare repositories have no primary working directory and are reported
    /// as [`GiwoError::NotARepository`] as well.
    pub fn discover(start: &Path) -> Result<Self> {
        let not_a_repo = || GiwoError::NotARepository {
            path: start.to_path_buf(),
        };

        let repo = Repository::discover(start).map_err(|e| {
            debug!(path = %start.display(), error = %e, "repository discovery failed");
            not_a_repo()
        })?;

        // For a linked worktree git2 reports the linked directory; the
        // primary checkout is the parent of the common git directory.
        let root = if repo.is_worktree() {
            repo.commondir()
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(not_a_repo)?
        } else {
            repo.workdir().map(Path::to_path_buf).ok_or_else(not_a_repo)?
        };

        let root = root.canonicalize().unwrap_or(root);
        Ok(Self { repo, root })
    }

    /// Runs git in `dir`, turning a failure status into [`GiwoError::Git`]
    fn run(&self, dir: &Path, args: &[&str]) -> Result<Output> {
        debug!(dir = %dir.display(), ?args, "running git");

        let output = Command::new(GIT_CMD)
            .args(args)
            .current_dir(dir)
            .output()
            .map_err(|e| GiwoError::git(args, e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!(?args, status = ?output.status.code(), %stderr, "git failed");
            return Err(GiwoError::git(args, stderr));
        }

        Ok(output)
    }

    /// Executes a git command in `dir` and returns its stdout
    fn execute_git_command(&self, dir: &Path, args: &[&str]) -> Result<String> {
        let output = self.run(dir, args)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn execute_in_root(&self, args: &[&str]) -> Result<String> {
        self.execute_git_command(&self.root, args)
    }
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl GitInterface for RealGit {
    fn repository_root(&self) -> Result<PathBuf> {
        Ok(self.root.clone())
    }

    fn list_worktrees(&self) -> Result<String> {
        self.execute_in_root(&[GIT_WORKTREE, GIT_LIST, GIT_OPT_PORCELAIN])
    }

    fn status(&self, worktree: &Path) -> Result<String> {
        self.execute_git_command(worktree, &[GIT_STATUS, GIT_OPT_PORCELAIN])
    }

    fn last_commit(&self, worktree: &Path) -> Result<String> {
        self.execute_git_command(
            worktree,
            &[GIT_LOG, GIT_OPT_LAST_ONE, GIT_LAST_COMMIT_FORMAT],
        )
    }

    fn divergence(&self, worktree: &Path, upstream: &str, local: &str) -> Result<String> {
        let range = format!("{upstream}...{local}");
        self.execute_git_command(
            worktree,
            &[GIT_REV_LIST, GIT_OPT_COUNT, GIT_OPT_LEFT_RIGHT, &range],
        )
    }

    fn merged_branches(&self, base_ref: &str) -> Result<String> {
        self.execute_in_root(&[GIT_BRANCH, GIT_OPT_MERGED, base_ref])
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.head().map_err(|e| GiwoError::git(&[GIT_HEAD], e.message()))?;
        if head.is_branch() {
            if let Some(name) = head.shorthand() {
                return Ok(name.to_string());
            }
        }

        // Detached: fall back to what `rev-parse` can tell, which is "HEAD"
        let name = self.execute_in_root(&[GIT_REV_PARSE, GIT_OPT_ABBREV_REF, GIT_HEAD])?;
        let name = name.trim();
        if name == GIT_HEAD {
            return Err(GiwoError::git(
                &[GIT_REV_PARSE, GIT_OPT_ABBREV_REF, GIT_HEAD],
                "in detached HEAD state and cannot determine branch",
            ));
        }
        Ok(name.to_string())
    }

    fn default_branch(&self, remote: &str) -> Result<String> {
        let reference = format!("refs/remotes/{remote}/HEAD");
        let output = self.execute_in_root(&[GIT_SYMBOLIC_REF, GIT_OPT_SHORT, &reference])?;
        let short = output.trim();
        let prefix = format!("{remote}/");
        Ok(short.strip_prefix(&prefix).unwrap_or(short).to_string())
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        let remote_obj = self
            .repo
            .find_remote(remote)
            .map_err(|e| GiwoError::git(&["remote", "get-url", remote], e.message()))?;
        remote_obj
            .url()
            .map(str::to_string)
            .ok_or_else(|| GiwoError::git(&["remote", "get-url", remote], "remote has no URL"))
    }

    fn fetch(&self) -> Result<()> {
        self.execute_in_root(&[GIT_FETCH, GIT_OPT_PRUNE])?;
        Ok(())
    }

    fn add_worktree(&self, branch: &str, path: &Path, start_point: &str) -> Result<()> {
        let path = path_arg(path);
        self.execute_in_root(&[
            GIT_WORKTREE,
            GIT_ADD,
            GIT_OPT_NEW_BRANCH,
            branch,
            &path,
            start_point,
        ])?;
        Ok(())
    }

    fn remove_worktree(&self, path: &Path, force: bool) -> Result<()> {
        let path = path_arg(path);
        let mut args = vec![GIT_WORKTREE, GIT_REMOVE];
        if force {
            args.push(GIT_OPT_FORCE);
        }
        args.push(&path);
        self.execute_in_root(&args)?;
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        self.execute_in_root(&[GIT_BRANCH, GIT_OPT_DELETE_FORCE, name])?;
        Ok(())
    }

    fn prune(&self) -> Result<String> {
        // `prune -v` reports on stderr
        let output = self.run(&self.root, &[GIT_WORKTREE, GIT_PRUNE, GIT_OPT_VERBOSE])?;
        let mut report = String::from_utf8_lossy(&output.stdout).into_owned();
        report.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn git(dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .expect("git should run");
        assert!(status.status.success(), "git {args:?} failed");
    }

    fn setup_test_repo() -> (TempDir, RealGit) {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path();

        git(repo_path, &["init", "-b", "main"]);
        git(repo_path, &["config", "user.email", "test@example.com"]);
        git(repo_path, &["config", "user.name", "Test User"]);
        std::fs::write(repo_path.join("README.md"), "# Test Repo").unwrap();
        git(repo_path, &["add", "."]);
        git(repo_path, &["commit", "-m", "Initial commit"]);

        let real = RealGit::discover(repo_path).unwrap();
        (temp_dir, real)
    }

    #[test]
    fn test_discover_outside_repository() {
        let temp_dir = TempDir::new().unwrap();
        match RealGit::discover(temp_dir.path()) {
            Err(GiwoError::NotARepository { .. }) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => {
                // Only possible when the temp dir sits inside a repository
            }
        }
    }

    #[test]
    fn test_list_and_status() {
        let (temp_dir, real) = setup_test_repo();
        let root = real.repository_root().unwrap();
        assert_eq!(root, temp_dir.path().canonicalize().unwrap());

        let listing = real.list_worktrees().unwrap();
        assert!(listing.contains("branch refs/heads/main"));

        assert_eq!(real.status(&root).unwrap(), "");
        std::fs::write(root.join("README.md"), "changed").unwrap();
        assert!(real.status(&root).unwrap().starts_with(" M"));

        let commit = real.last_commit(&root).unwrap();
        assert!(commit.starts_with("Initial commit|"));
        assert_eq!(real.current_branch().unwrap(), "main");
    }

    #[test]
    fn test_divergence_without_upstream_fails() {
        let (_temp_dir, real) = setup_test_repo();
        let root = real.repository_root().unwrap();
        assert!(real.divergence(&root, "origin/main", "HEAD").is_err());
        assert!(real.remote_url("origin").is_err());
    }

    #[test]
    fn test_add_and_remove_worktree() {
        let (_temp_dir, real) = setup_test_repo();
        let root = real.repository_root().unwrap();
        let path = root.join(".worktree").join("feature");

        real.add_worktree("feature", &path, "main").unwrap();
        assert!(path.exists());
        assert!(real.list_worktrees().unwrap().contains("refs/heads/feature"));

        real.remove_worktree(&path, false).unwrap();
        assert!(!path.exists());
        real.delete_branch("feature").unwrap();
        assert!(real.delete_branch("feature").is_err());
    }
}
