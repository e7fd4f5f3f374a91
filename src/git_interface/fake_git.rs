use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::GitInterface;
use crate::constants::GIT_REFS_HEADS;
use crate::error::{GiwoError, Result};

/// Canned answer for one query: stdout on success, stderr on failure
type Response = std::result::Result<String, String>;

/// A mutating call observed by [`FakeGit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Fetch,
    AddWorktree {
        branch: String,
        path: PathBuf,
        start_point: String,
    },
    RemoveWorktree {
        path: PathBuf,
        force: bool,
    },
    DeleteBranch(String),
    Prune,
}

#[derive(Debug, Clone)]
struct FakeWorktree {
    path: PathBuf,
    branch: Option<String>,
}

/// In-memory [`GitInterface`] serving scripted output
///
/// The worktree registry is kept as a list and rendered to porcelain text
/// on demand, so `add_worktree`/`remove_worktree` are reflected by later
/// listings. Queries without a scripted answer behave like a repository
/// with no remote: status is clean, while commit, divergence and merged
/// lookups fail.
pub struct FakeGit {
    root: Option<PathBuf>,
    worktrees: RefCell<Vec<FakeWorktree>>,
    raw_listing: Option<Response>,
    status: HashMap<PathBuf, Response>,
    last_commit: HashMap<PathBuf, Response>,
    divergence: HashMap<String, Response>,
    merged: HashMap<String, Response>,
    current_branch: Option<String>,
    default_branch: Option<String>,
    remote_url: Option<String>,
    failing: HashSet<&'static str>,
    sticky_worktrees: HashSet<PathBuf>,
    calls: RefCell<Vec<GitCall>>,
}

impl FakeGit {
    /// A repository rooted at `root` whose primary worktree is on `main`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            worktrees: RefCell::new(vec![FakeWorktree {
                path: root.clone(),
                branch: Some("main".to_string()),
            }]),
            root: Some(root),
            raw_listing: None,
            status: HashMap::new(),
            last_commit: HashMap::new(),
            divergence: HashMap::new(),
            merged: HashMap::new(),
            current_branch: Some("main".to_string()),
            default_branch: None,
            remote_url: None,
            failing: HashSet::new(),
            sticky_worktrees: HashSet::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// A fake whose repository lookup always fails
    pub fn outside_repository() -> Self {
        let mut fake = Self::new("/");
        fake.root = None;
        fake
    }

    /// Registers a linked worktree checked out on `branch`
    pub fn with_worktree(self, path: impl Into<PathBuf>, branch: &str) -> Self {
        self.worktrees.borrow_mut().push(FakeWorktree {
            path: path.into(),
            branch: Some(branch.to_string()),
        });
        self
    }

    /// Registers a linked worktree with a detached `HEAD`
    pub fn with_detached_worktree(self, path: impl Into<PathBuf>) -> Self {
        self.worktrees.borrow_mut().push(FakeWorktree {
            path: path.into(),
            branch: None,
        });
        self
    }

    /// Serves `text` verbatim as the porcelain listing
    pub fn with_raw_listing(mut self, text: impl Into<String>) -> Self {
        self.raw_listing = Some(Ok(text.into()));
        self
    }

    pub fn with_failing_listing(mut self, stderr: &str) -> Self {
        self.raw_listing = Some(Err(stderr.to_string()));
        self
    }

    pub fn with_status(mut self, path: impl Into<PathBuf>, output: &str) -> Self {
        self.status.insert(path.into(), Ok(output.to_string()));
        self
    }

    pub fn with_failing_status(mut self, path: impl Into<PathBuf>, stderr: &str) -> Self {
        self.status.insert(path.into(), Err(stderr.to_string()));
        self
    }

    pub fn with_last_commit(mut self, path: impl Into<PathBuf>, output: &str) -> Self {
        self.last_commit.insert(path.into(), Ok(output.to_string()));
        self
    }

    /// Scripts the `rev-list --left-right --count` answer for `upstream`
    pub fn with_divergence(mut self, upstream: &str, behind: usize, ahead: usize) -> Self {
        self.divergence
            .insert(upstream.to_string(), Ok(format!("{behind}\t{ahead}\n")));
        self
    }

    /// Scripts the `branch --merged <base_ref>` answer
    pub fn with_merged(mut self, base_ref: &str, output: &str) -> Self {
        self.merged.insert(base_ref.to_string(), Ok(output.to_string()));
        self
    }

    pub fn with_current_branch(mut self, branch: Option<&str>) -> Self {
        self.current_branch = branch.map(str::to_string);
        self
    }

    pub fn with_default_branch(mut self, branch: &str) -> Self {
        self.default_branch = Some(branch.to_string());
        self
    }

    pub fn with_remote_url(mut self, url: &str) -> Self {
        self.remote_url = Some(url.to_string());
        self
    }

    /// Makes a mutating operation fail
    ///
    /// Accepted names: `fetch`, `add`, `remove`, `branch-delete`, `prune`.
    pub fn failing(mut self, operation: &'static str) -> Self {
        self.failing.insert(operation);
        self
    }

    /// Makes plain removal of `path` fail so that only `--force` succeeds
    pub fn with_modified_worktree(mut self, path: impl Into<PathBuf>) -> Self {
        self.sticky_worktrees.insert(path.into());
        self
    }

    /// Mutating calls seen so far, in order
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: GitCall) {
        self.calls.borrow_mut().push(call);
    }

    fn fail_if_scripted(&self, operation: &'static str, args: &[&str]) -> Result<()> {
        if self.failing.contains(operation) {
            return Err(GiwoError::git(args, format!("fatal: {operation} failed")));
        }
        Ok(())
    }

    fn render_listing(&self) -> String {
        let mut out = String::new();
        for (i, worktree) in self.worktrees.borrow().iter().enumerate() {
            out.push_str(&format!("worktree {}\n", worktree.path.display()));
            out.push_str(&format!("HEAD {:040x}\n", i + 1));
            match &worktree.branch {
                Some(branch) => out.push_str(&format!("branch {GIT_REFS_HEADS}{branch}\n")),
                None => out.push_str("detached\n"),
            }
            out.push('\n');
        }
        out
    }
}

fn answer(response: Option<&Response>, args: &[&str], missing: &str) -> Result<String> {
    match response {
        Some(Ok(stdout)) => Ok(stdout.clone()),
        Some(Err(stderr)) => Err(GiwoError::git(args, stderr.clone())),
        None => Err(GiwoError::git(args, missing)),
    }
}

impl GitInterface for FakeGit {
    fn repository_root(&self) -> Result<PathBuf> {
        self.root.clone().ok_or_else(|| GiwoError::NotARepository {
            path: PathBuf::from("."),
        })
    }

    fn list_worktrees(&self) -> Result<String> {
        match &self.raw_listing {
            Some(response) => answer(
                Some(response),
                &["worktree", "list", "--porcelain"],
                "",
            ),
            None => Ok(self.render_listing()),
        }
    }

    fn status(&self, worktree: &Path) -> Result<String> {
        match self.status.get(worktree) {
            None => Ok(String::new()),
            response => answer(response, &["status", "--porcelain"], ""),
        }
    }

    fn last_commit(&self, worktree: &Path) -> Result<String> {
        answer(
            self.last_commit.get(worktree),
            &["log", "-1", "--format=%s|%ct"],
            "fatal: your current branch does not have any commits yet",
        )
    }

    fn divergence(&self, _worktree: &Path, upstream: &str, local: &str) -> Result<String> {
        let range = format!("{upstream}...{local}");
        answer(
            self.divergence.get(upstream),
            &["rev-list", "--count", "--left-right", &range],
            &format!("fatal: ambiguous argument '{range}': unknown revision"),
        )
    }

    fn merged_branches(&self, base_ref: &str) -> Result<String> {
        answer(
            self.merged.get(base_ref),
            &["branch", "--merged", base_ref],
            &format!("error: malformed object name {base_ref}"),
        )
    }

    fn current_branch(&self) -> Result<String> {
        self.current_branch.clone().ok_or_else(|| {
            GiwoError::git(&["rev-parse", "--abbrev-ref", "HEAD"], "detached HEAD")
        })
    }

    fn default_branch(&self, remote: &str) -> Result<String> {
        let reference = format!("refs/remotes/{remote}/HEAD");
        self.default_branch.clone().ok_or_else(|| {
            GiwoError::git(
                &["symbolic-ref", "--short", &reference],
                format!("fatal: ref {reference} is not a symbolic ref"),
            )
        })
    }

    fn remote_url(&self, remote: &str) -> Result<String> {
        self.remote_url.clone().ok_or_else(|| {
            GiwoError::git(
                &["remote", "get-url", remote],
                format!("error: No such remote '{remote}'"),
            )
        })
    }

    fn fetch(&self) -> Result<()> {
        self.record(GitCall::Fetch);
        self.fail_if_scripted("fetch", &["fetch", "--prune"])
    }

    fn add_worktree(&self, branch: &str, path: &Path, start_point: &str) -> Result<()> {
        self.record(GitCall::AddWorktree {
            branch: branch.to_string(),
            path: path.to_path_buf(),
            start_point: start_point.to_string(),
        });
        self.fail_if_scripted("add", &["worktree", "add", "-b", branch])?;

        // Mirror git by materialising the checkout when the root is real
        if self.root.as_deref().is_some_and(Path::exists) {
            std::fs::create_dir_all(path)?;
        }

        self.worktrees.borrow_mut().push(FakeWorktree {
            path: path.to_path_buf(),
            branch: Some(branch.to_string()),
        });
        Ok(())
    }

    fn remove_worktree(&self, path: &Path, force: bool) -> Result<()> {
        self.record(GitCall::RemoveWorktree {
            path: path.to_path_buf(),
            force,
        });
        let args = ["worktree", "remove"];
        self.fail_if_scripted("remove", &args)?;

        if !force && self.sticky_worktrees.contains(path) {
            return Err(GiwoError::git(
                &args,
                format!(
                    "fatal: '{}' contains modified or untracked files, use --force to delete it",
                    path.display()
                ),
            ));
        }

        let mut worktrees = self.worktrees.borrow_mut();
        let before = worktrees.len();
        worktrees.retain(|w| w.path != path);
        if worktrees.len() == before {
            return Err(GiwoError::git(
                &args,
                format!("fatal: '{}' is not a working tree", path.display()),
            ));
        }

        if path.exists() {
            std::fs::remove_dir_all(path)?;
        }
        Ok(())
    }

    fn delete_branch(&self, name: &str) -> Result<()> {
        self.record(GitCall::DeleteBranch(name.to_string()));
        self.fail_if_scripted("branch-delete", &["branch", "-D", name])
    }

    fn prune(&self) -> Result<String> {
        self.record(GitCall::Prune);
        self.fail_if_scripted("prune", &["worktree", "prune", "-v"])?;
        Ok(String::new())
    }
}
