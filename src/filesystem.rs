//! Filesystem operations abstraction layer
//!
//! The best-effort file copy into new worktrees goes through [`FileSystem`]
//! so its failure handling can be exercised without breaking a real disk.

use std::io;
use std::path::{Path, PathBuf};

/// Trait for the filesystem operations giwo performs itself
///
/// Everything else on disk (checkouts, removals) is git's job.
pub trait FileSystem {
    /// Create a directory and all its parent directories
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy a file from source to destination, returning the bytes copied
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;

    /// Paths of the entries of a directory
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Check if a path exists (following symlinks)
    fn exists(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Check if a path is itself a symlink
    fn is_symlink(&self, path: &Path) -> bool;
}

/// Production implementation using std::fs
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl RealFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFileSystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        std::fs::copy(from, to)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.symlink_metadata()
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_real_filesystem_basics() {
        let temp_dir = TempDir::new().unwrap();
        let fs = RealFileSystem::new();
        let nested = temp_dir.path().join("a/b");

        fs.create_dir_all(&nested).unwrap();
        assert!(fs.is_dir(&nested));

        let file = nested.join("f.txt");
        std::fs::write(&file, "hello").unwrap();
        assert!(fs.is_file(&file));
        assert!(!fs.is_symlink(&file));

        let copied = temp_dir.path().join("g.txt");
        assert_eq!(fs.copy(&file, &copied).unwrap(), 5);
        assert!(fs.exists(&copied));

        assert_eq!(fs.read_dir(&nested).unwrap(), vec![file]);
        assert!(fs.read_dir(&temp_dir.path().join("missing")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_detection() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("target");
        std::fs::write(&target, "x").unwrap();
        let link = temp_dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(RealFileSystem.is_symlink(&link));
        assert!(!RealFileSystem.is_symlink(&temp_dir.path().join("nothing")));
    }
}
