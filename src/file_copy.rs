//! Best-effort copy of untracked files into new worktrees
//!
//! A fresh checkout lacks gitignored files such as `.env`. The configured
//! files are copied from the repository root into each new worktree. The
//! copy never fails the surrounding operation: every outcome is collected
//! in a [`CopyReport`] for the caller to display.

use std::io;
use std::path::Path;
use tracing::{debug, warn};

use crate::filesystem::{FileSystem, RealFileSystem};

/// Guards against runaway recursion through nested directories
const MAX_DIRECTORY_DEPTH: usize = 20;

/// Outcome of copying the configured files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Entries copied, with the number of files each contributed
    pub copied: Vec<(String, usize)>,
    /// Entries absent from the source directory
    pub missing: Vec<String>,
    /// Entries refused because they point outside the repository or are symlinks
    pub skipped: Vec<String>,
    /// Entries that failed to copy, with the error message
    pub failed: Vec<(String, String)>,
}

impl CopyReport {
    pub fn copied_count(&self) -> usize {
        self.copied.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Copies `files` (relative to `source`) into `destination`
pub fn copy_configured_files(files: &[String], source: &Path, destination: &Path) -> CopyReport {
    copy_configured_files_with_fs(files, source, destination, &RealFileSystem)
}

/// Implementation with filesystem abstraction for testing
pub fn copy_configured_files_with_fs(
    files: &[String],
    source: &Path,
    destination: &Path,
    fs: &dyn FileSystem,
) -> CopyReport {
    let mut report = CopyReport::default();

    for name in files {
        if !is_safe_path(name) {
            warn!(file = %name, "refusing to copy path outside the repository");
            report.skipped.push(name.clone());
            continue;
        }

        let from = source.join(name);
        if fs.is_symlink(&from) {
            debug!(file = %name, "skipping symlink");
            report.skipped.push(name.clone());
            continue;
        }
        if !fs.exists(&from) {
            report.missing.push(name.clone());
            continue;
        }

        match copy_entry(&from, &destination.join(name), fs, 0) {
            Ok(count) => {
                debug!(file = %name, count, "copied into worktree");
                report.copied.push((name.clone(), count));
            }
            Err(e) => {
                warn!(file = %name, error = %e, "failed to copy into worktree");
                report.failed.push((name.clone(), e.to_string()));
            }
        }
    }

    report
}

/// Copies a file, or a directory recursively, returning the number of files
fn copy_entry(from: &Path, to: &Path, fs: &dyn FileSystem, depth: usize) -> io::Result<usize> {
    if fs.is_file(from) {
        if let Some(parent) = to.parent() {
            fs.create_dir_all(parent)?;
        }
        fs.copy(from, to)?;
        return Ok(1);
    }

    if !fs.is_dir(from) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} is neither a file nor a directory", from.display()),
        ));
    }

    if depth >= MAX_DIRECTORY_DEPTH {
        return Err(io::Error::other(format!(
            "{} is nested too deeply",
            from.display()
        )));
    }

    fs.create_dir_all(to)?;
    let mut count = 0;
    for entry in fs.read_dir(from)? {
        if fs.is_symlink(&entry) {
            continue;
        }
        if let Some(file_name) = entry.file_name() {
            count += copy_entry(&entry, &to.join(file_name), fs, depth + 1)?;
        }
    }
    Ok(count)
}

/// Whether a configured entry stays inside the repository root
fn is_safe_path(path: &str) -> bool {
    if path.is_empty() || Path::new(path).is_absolute() {
        return false;
    }
    if path.starts_with('/') || path.starts_with('\\') {
        return false;
    }

    // Drive letters such as C:\
    if path.chars().nth(1) == Some(':') {
        return false;
    }

    path.split(['/', '\\'])
        .all(|component| component != ".." && component != ".")
}
