//! Configuration management for giwo
//!
//! Configuration is read once per invocation from `.giwo.toml` at the root
//! of the primary worktree and passed explicitly to the manager and the
//! command handlers. Every key is optional; a missing file means defaults.
//!
//! # File Format
//!
//! ```toml
//! [worktree]
//! dir = ".worktree"
//! copy_files = [".env", ".env.local"]
//!
//! [branches]
//! protected = ["main", "master", "develop", "dev"]
//! merge_bases = ["main", "master"]
//! remote = "origin"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_COPY_FILES, DEFAULT_MERGE_BASES, DEFAULT_PROTECTED_BRANCHES,
    DEFAULT_WORKTREE_DIR, GIT_DEFAULT_REMOTE,
};
use crate::error::{GiwoError, Result};

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub worktree: WorktreeConfig,
    pub branches: BranchesConfig,
}

/// Where worktrees live and what gets copied into new ones
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct WorktreeConfig {
    /// Directory below the repository root holding one subdirectory per branch
    pub dir: String,

    /// Files copied from the repository root into every new worktree
    ///
    /// These are usually gitignored files (`.env`) that a fresh checkout
    /// would otherwise lack. Missing files are skipped silently.
    pub copy_files: Vec<String>,
}

impl Default for WorktreeConfig {
    fn default() -> Self {
        Self {
            dir: DEFAULT_WORKTREE_DIR.to_string(),
            copy_files: to_strings(DEFAULT_COPY_FILES),
        }
    }
}

/// Branch policy knobs
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BranchesConfig {
    /// Branches never offered for cleanup
    pub protected: Vec<String>,

    /// Candidate bases for the merged-branch query, tried in order
    pub merge_bases: Vec<String>,

    /// Remote whose tracking branches serve as upstream counterparts
    pub remote: String,
}

impl Default for BranchesConfig {
    fn default() -> Self {
        Self {
            protected: to_strings(DEFAULT_PROTECTED_BRANCHES),
            merge_bases: to_strings(DEFAULT_MERGE_BASES),
            remote: GIT_DEFAULT_REMOTE.to_string(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Config {
    /// Loads `.giwo.toml` from the repository root
    ///
    /// # Returns
    ///
    /// * `Ok(config)` - The parsed file, or defaults when there is no file
    /// * `Err(GiwoError::Config)` - The file exists but is not valid
    pub fn load_from_root(root: &Path) -> Result<Self> {
        let path = Self::path_for_root(root);
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config = Self::from_toml(&path, &content)?;
        debug!(path = %path.display(), ?config, "loaded configuration");
        Ok(config)
    }

    /// Parses configuration text; `path` is only used in error messages
    pub fn from_toml(path: &Path, content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| GiwoError::Config {
            path: path.to_path_buf(),
            message: e.message().to_string(),
        })?;
        config.validate(path)?;
        Ok(config)
    }

    pub fn path_for_root(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let invalid = |message: &str| {
            Err(GiwoError::Config {
                path: path.to_path_buf(),
                message: message.to_string(),
            })
        };

        if self.worktree.dir.trim().is_empty() {
            return invalid("worktree.dir cannot be empty");
        }
        if Path::new(&self.worktree.dir).is_absolute() {
            return invalid("worktree.dir must be relative to the repository root");
        }
        if self.branches.remote.trim().is_empty() {
            return invalid("branches.remote cannot be empty");
        }
        if self.branches.merge_bases.is_empty() {
            return invalid("branches.merge_bases needs at least one branch");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.worktree.dir, ".worktree");
        assert_eq!(config.worktree.copy_files.len(), 6);
        assert!(config.worktree.copy_files.contains(&".env.local".to_string()));
        assert_eq!(config.branches.protected, vec!["main", "master", "develop", "dev"]);
        assert_eq!(config.branches.merge_bases, vec!["main", "master"]);
        assert_eq!(config.branches.remote, "origin");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let content = r#"
[worktree]
dir = "trees"

[branches]
protected = ["trunk"]
"#;
        let config = Config::from_toml(Path::new(".giwo.toml"), content).unwrap();
        assert_eq!(config.worktree.dir, "trees");
        assert_eq!(config.worktree.copy_files, WorktreeConfig::default().copy_files);
        assert_eq!(config.branches.protected, vec!["trunk"]);
        assert_eq!(config.branches.remote, "origin");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let err = Config::from_toml(Path::new("/r/.giwo.toml"), "[worktree\ndir = 1").unwrap_err();
        assert!(matches!(err, GiwoError::Config { .. }));
        assert!(err.to_string().contains("/r/.giwo.toml"));

        let err = Config::from_toml(Path::new("x"), "[worktree]\ndir = 3\n").unwrap_err();
        assert!(matches!(err, GiwoError::Config { .. }));
    }

    #[test]
    fn test_semantic_validation() {
        for content in [
            "[worktree]\ndir = \"\"\n",
            "[worktree]\ndir = \"/abs\"\n",
            "[branches]\nremote = \" \"\n",
            "[branches]\nmerge_bases = []\n",
        ] {
            assert!(Config::from_toml(Path::new("x"), content).is_err(), "{content}");
        }
    }

    #[test]
    fn test_load_from_root() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(Config::load_from_root(temp_dir.path()).unwrap(), Config::default());

        std::fs::write(
            temp_dir.path().join(".giwo.toml"),
            "[branches]\nremote = \"upstream\"\n",
        )
        .unwrap();
        let config = Config::load_from_root(temp_dir.path()).unwrap();
        assert_eq!(config.branches.remote, "upstream");
    }
}
