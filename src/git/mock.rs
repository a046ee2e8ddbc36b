use crate::error::{ReleaseError, Result};
use crate::git::SourceControl;
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

/// Mock repository for testing without actual git operations
///
/// Records every staged path, commit message and push so tests can assert on
/// what the release workflow asked version control to do.
#[derive(Default)]
pub struct MockRepository {
    dirty: Vec<String>,
    reject_push: bool,
    staged: RefCell<Vec<PathBuf>>,
    commits: RefCell<Vec<String>>,
    pushes: Cell<usize>,
}

impl MockRepository {
    /// Create a mock with a clean working tree
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock whose working tree reports the given pending changes
    pub fn with_dirty_paths(paths: Vec<String>) -> Self {
        MockRepository {
            dirty: paths,
            ..Self::default()
        }
    }

    /// Make every push fail as if the remote had diverged
    pub fn rejecting_push(mut self) -> Self {
        self.reject_push = true;
        self
    }

    pub fn staged(&self) -> Vec<PathBuf> {
        self.staged.borrow().clone()
    }

    pub fn commits(&self) -> Vec<String> {
        self.commits.borrow().clone()
    }

    pub fn push_count(&self) -> usize {
        self.pushes.get()
    }
}

impl SourceControl for MockRepository {
    fn dirty_paths(&self) -> Result<Vec<String>> {
        Ok(self.dirty.clone())
    }

    fn add(&self, path: &Path) -> Result<()> {
        self.staged.borrow_mut().push(path.to_path_buf());
        Ok(())
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.commits.borrow_mut().push(message.to_string());
        Ok(())
    }

    fn push(&self) -> Result<()> {
        if self.reject_push {
            return Err(ReleaseError::push(
                "remote rejected refs/heads/main: non-fast-forward",
            ));
        }
        self.pushes.set(self.pushes.get() + 1);
        Ok(())
    }
}
