//! Worktree manager facade
//!
//! [`WorktreeManager`] composes the parser, the enricher and the branch
//! policy into the operations the commands need, and owns the mapping from
//! a branch name to its directory under the worktree dir.
//!
//! The manager never prompts. Confirmations and rendering belong to the
//! command layer; best-effort side steps (file copy, branch deletion) are
//! reported back in [`CreateOutcome`] and [`RemoveReport`] instead of
//! failing the operation.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::constants::DEFAULT_BASE_BRANCH;
use crate::core::{validate_branch_name, BranchPolicy, Enricher};
use crate::error::{GiwoError, Result};
use crate::file_copy::{copy_configured_files, CopyReport};
use crate::git_interface::{GitInterface, RealGit};
use crate::worktree::{parse_worktree_list, same_path, WorktreeRecord};

/// Parameters of `create`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRequest {
    pub branch: String,
    /// Base branch on the remote; resolved by the manager when `None`
    pub base: Option<String>,
    /// Skip the "directory already exists" check
    pub force: bool,
}

impl CreateRequest {
    pub fn new(branch: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            base: None,
            force: false,
        }
    }
}

/// What `create` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOutcome {
    pub path: PathBuf,
    /// Remote-tracking start point, e.g. `origin/main`
    pub start_point: String,
    pub copy: CopyReport,
}

/// What `remove` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveReport {
    pub path: PathBuf,
    /// The plain removal failed and `--force` was needed
    pub forced: bool,
    pub branch_deleted: bool,
    /// Why the branch could not be deleted, when it was meant to be
    pub branch_warning: Option<String>,
}

/// Owner and name of a GitHub-style remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    pub owner: String,
    pub name: String,
}

impl std::fmt::Display for RemoteRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Extracts `owner/name` from an SSH or HTTPS GitHub URL
///
/// ```rust
/// use giwo::manager::parse_remote_repository;
///
/// let repo = parse_remote_repository("git@github.com:knwoop/giwo.git").unwrap();
/// assert_eq!(repo.to_string(), "knwoop/giwo");
/// assert!(parse_remote_repository("/srv/git/project.git").is_none());
/// ```
pub fn parse_remote_repository(url: &str) -> Option<RemoteRepository> {
    const PREFIXES: &[&str] = &[
        "git@github.com:",
        "ssh://git@github.com/",
        "https://github.com/",
    ];

    let url = url.trim();
    let path = PREFIXES.iter().find_map(|p| url.strip_prefix(p))?;
    let (owner, name) = path.split_once('/')?;
    let name = name.strip_suffix(".git").unwrap_or(name);

    if owner.is_empty() || name.is_empty() {
        return None;
    }

    Some(RemoteRepository {
        owner: owner.to_string(),
        name: name.to_string(),
    })
}

/// Linked worktrees among `records` whose branch is in `merged`, in listing order
pub fn select_merged<'r>(records: &'r [WorktreeRecord], merged: &[String]) -> Vec<&'r WorktreeRecord> {
    records
        .iter()
        .filter(|r| !r.is_primary && merged.iter().any(|b| *b == r.branch))
        .collect()
}

/// Facade over one repository's worktrees
pub struct WorktreeManager<G: GitInterface = RealGit> {
    git: G,
    root: PathBuf,
    config: Config,
    policy: BranchPolicy,
}

impl WorktreeManager<RealGit> {
    /// Opens the repository containing the current directory and loads its configuration
    pub fn discover() -> Result<Self> {
        let git = RealGit::new()?;
        let root = git.repository_root()?;
        let config = Config::load_from_root(&root)?;
        Self::new(git, config)
    }
}

impl<G: GitInterface> WorktreeManager<G> {
    pub fn new(git: G, config: Config) -> Result<Self> {
        let root = git.repository_root().map_err(|e| match e {
            GiwoError::NotARepository { .. } => e,
            other => {
                debug!(error = %other, "repository root lookup failed");
                GiwoError::NotARepository {
                    path: PathBuf::from("."),
                }
            }
        })?;
        let policy = BranchPolicy::from_config(&config.branches);

        Ok(Self {
            git,
            root,
            config,
            policy,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn policy(&self) -> &BranchPolicy {
        &self.policy
    }

    pub fn git(&self) -> &G {
        &self.git
    }

    fn remote(&self) -> &str {
        &self.config.branches.remote
    }

    /// Directory holding the linked worktrees
    pub fn worktree_dir(&self) -> PathBuf {
        self.root.join(&self.config.worktree.dir)
    }

    /// Directory a worktree for `branch` lives in
    pub fn worktree_path(&self, branch: &str) -> PathBuf {
        self.worktree_dir().join(branch)
    }

    /// Parsed listing with the primary worktree marked, not enriched
    pub fn records(&self) -> Result<Vec<WorktreeRecord>> {
        let raw = self.git.list_worktrees()?;
        let mut records = parse_worktree_list(&raw);
        for record in &mut records {
            record.is_primary = same_path(&record.path, &self.root);
        }
        Ok(records)
    }

    /// Every worktree with status, last commit and divergence filled in
    pub fn list(&self) -> Result<Vec<WorktreeRecord>> {
        let mut records = self.records()?;
        let enricher = Enricher::new(&self.git, self.remote());
        for record in &mut records {
            enricher.enrich(record);
        }
        debug!(count = records.len(), "listed worktrees");
        Ok(records)
    }

    /// Base branch for a new worktree
    ///
    /// Tries, in order: the explicit value, the branch checked out in the
    /// primary worktree, the remote's default branch, then `main`.
    pub fn resolve_base_branch(&self, explicit: Option<&str>) -> String {
        if let Some(base) = explicit.map(str::trim).filter(|b| !b.is_empty()) {
            return base.to_string();
        }

        match self.git.current_branch() {
            Ok(branch) if !branch.trim().is_empty() => return branch.trim().to_string(),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "current branch unavailable"),
        }

        match self.git.default_branch(self.remote()) {
            Ok(branch) if !branch.trim().is_empty() => return branch.trim().to_string(),
            Ok(_) => {}
            Err(e) => debug!(error = %e, "default branch unavailable"),
        }

        DEFAULT_BASE_BRANCH.to_string()
    }

    /// Creates a worktree on a new branch started from the remote base
    ///
    /// Validation and the existence check run before any git call.
    pub fn create(&self, request: &CreateRequest) -> Result<CreateOutcome> {
        validate_branch_name(&request.branch)?;

        let path = self.worktree_path(&request.branch);
        if !request.force && path.exists() {
            return Err(GiwoError::WorktreeExists(path));
        }

        std::fs::create_dir_all(self.worktree_dir())?;

        let base = self.resolve_base_branch(request.base.as_deref());
        let start_point = format!("{}/{}", self.remote(), base);

        self.git.fetch()?;
        self.git.add_worktree(&request.branch, &path, &start_point)?;
        info!(branch = %request.branch, path = %path.display(), %start_point, "created worktree");

        let copy = copy_configured_files(&self.config.worktree.copy_files, &self.root, &path);

        Ok(CreateOutcome {
            path,
            start_point,
            copy,
        })
    }

    /// Finds the registered worktree for `branch`
    ///
    /// Matches on the checked-out branch first, then on the conventional
    /// path, so a worktree whose branch was switched can still be found.
    pub fn find(&self, branch: &str) -> Result<WorktreeRecord> {
        let expected = self.worktree_path(branch);
        let records = self.records()?;

        let by_branch = records
            .iter()
            .position(|r| r.branch == branch && !r.is_detached());
        let index = by_branch.or_else(|| records.iter().position(|r| r.is_at(&expected)));

        match index {
            Some(i) => Ok(records[i].clone()),
            None => Err(GiwoError::WorktreeNotFound(branch.to_string())),
        }
    }

    /// Removes the worktree of `branch` and, unless kept, the branch itself
    pub fn remove(&self, branch: &str, keep_branch: bool) -> Result<RemoveReport> {
        let record = self.find(branch)?;
        if record.is_primary {
            return Err(GiwoError::PrimaryWorktree(record.path));
        }

        let forced = match self.git.remove_worktree(&record.path, false) {
            Ok(()) => false,
            Err(e) => {
                debug!(error = %e, "plain removal failed, retrying with --force");
                self.git.remove_worktree(&record.path, true)?;
                true
            }
        };
        info!(%branch, path = %record.path.display(), forced, "removed worktree");

        let mut report = RemoveReport {
            path: record.path,
            forced,
            branch_deleted: false,
            branch_warning: None,
        };

        if !keep_branch {
            match self.git.delete_branch(branch) {
                Ok(()) => report.branch_deleted = true,
                Err(e) => {
                    warn!(%branch, error = %e, "failed to delete branch");
                    report.branch_warning = Some(e.to_string());
                }
            }
        }

        Ok(report)
    }

    /// Local branches merged into the first available merge base
    pub fn merged_branches(&self) -> Result<Vec<String>> {
        self.policy.merged_branches(&self.git)
    }

    /// Linked worktrees whose branch has been merged
    pub fn merged_worktrees<'r>(
        &self,
        records: &'r [WorktreeRecord],
    ) -> Result<Vec<&'r WorktreeRecord>> {
        let merged = self.merged_branches()?;
        Ok(select_merged(records, &merged))
    }

    /// `git worktree prune -v`; returns git's report
    pub fn prune(&self) -> Result<String> {
        let output = self.git.prune()?;
        info!("pruned worktree metadata");
        Ok(output)
    }

    pub fn current_branch(&self) -> Result<String> {
        self.git.current_branch()
    }

    pub fn default_branch(&self) -> Result<String> {
        self.git.default_branch(self.remote())
    }

    /// GitHub owner/name of the configured remote, if it is a GitHub URL
    pub fn remote_repository(&self) -> Result<Option<RemoteRepository>> {
        let url = self.git.remote_url(self.remote())?;
        Ok(parse_remote_repository(&url))
    }
}
