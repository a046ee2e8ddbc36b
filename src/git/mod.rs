//! Source control gate
//!
//! The [SourceControl] trait is the seam between the release workflow and
//! version control. Implementations:
//!
//! - [repository::Git2Repository]: a real implementation using the `git2` crate
//! - [mock::MockRepository]: an in-memory implementation for testing
//!
//! The workflow only needs four things from version control: refuse to start
//! on a dirty tree, stage the version file, commit it and push it.

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::path::Path;

use crate::error::{ReleaseError, Result};

/// Version control operations used by the release workflow
pub trait SourceControl {
    /// Paths with pending changes
    ///
    /// Includes modified and staged files as well as untracked files that are
    /// not ignored. An empty list means the working tree is clean.
    fn dirty_paths(&self) -> Result<Vec<String>>;

    /// Stage a single file
    fn add(&self, path: &Path) -> Result<()>;

    /// Commit the staged changes on HEAD
    fn commit(&self, message: &str) -> Result<()>;

    /// Push the current branch to its remote
    ///
    /// A rejected push is returned as [ReleaseError::Push]; there is no
    /// conflict handling.
    fn push(&self) -> Result<()>;

    /// Fail unless the working tree has no pending changes
    fn assert_clean(&self) -> Result<()> {
        let dirty = self.dirty_paths()?;
        if dirty.is_empty() {
            return Ok(());
        }

        let mut listing = dirty.iter().take(5).cloned().collect::<Vec<_>>().join(", ");
        if dirty.len() > 5 {
            listing.push_str(&format!(" and {} more", dirty.len() - 5));
        }
        Err(ReleaseError::dirty(listing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assert_clean_lists_dirty_paths() {
        let repo = MockRepository::with_dirty_paths(vec!["README.md".to_string()]);
        let err = repo.assert_clean().unwrap_err();
        assert!(err.to_string().contains("README.md"));
    }

    #[test]
    fn test_assert_clean_truncates_long_listing() {
        let paths = (0..8).map(|i| format!("file{}.txt", i)).collect();
        let repo = MockRepository::with_dirty_paths(paths);
        let msg = repo.assert_clean().unwrap_err().to_string();
        assert!(msg.contains("file4.txt"));
        assert!(!msg.contains("file5.txt"));
        assert!(msg.contains("and 3 more"));
    }

    #[test]
    fn test_assert_clean_passes_on_clean_tree() {
        assert!(MockRepository::new().assert_clean().is_ok());
    }
}
