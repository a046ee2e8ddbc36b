use crate::error::{ReleaseError, Result};
use crate::forge::Forge;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A release created through [MockForge]
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedRelease {
    pub owner: String,
    pub repo: String,
    pub tag_name: String,
    pub title: String,
}

/// In-memory forge for testing the release workflow
pub struct MockForge {
    next_id: u64,
    existing: HashMap<String, u64>,
    fail_upload: bool,
    created: RefCell<Vec<CreatedRelease>>,
    uploads: RefCell<Vec<(u64, PathBuf)>>,
}

impl MockForge {
    /// Create a mock that hands out `next_id` to the next created release
    pub fn new(next_id: u64) -> Self {
        MockForge {
            next_id,
            existing: HashMap::new(),
            fail_upload: false,
            created: RefCell::new(Vec::new()),
            uploads: RefCell::new(Vec::new()),
        }
    }

    /// Pretend a release already exists for `tag_name`
    pub fn with_existing_release(mut self, tag_name: impl Into<String>, id: u64) -> Self {
        self.existing.insert(tag_name.into(), id);
        self
    }

    /// Make every upload fail with a server error
    pub fn failing_upload(mut self) -> Self {
        self.fail_upload = true;
        self
    }

    pub fn created(&self) -> Vec<CreatedRelease> {
        self.created.borrow().clone()
    }

    pub fn uploads(&self) -> Vec<(u64, PathBuf)> {
        self.uploads.borrow().clone()
    }
}

impl Forge for MockForge {
    fn find_release(&self, _owner: &str, _repo: &str, tag_name: &str) -> Result<Option<u64>> {
        Ok(self.existing.get(tag_name).copied())
    }

    fn create_release(
        &self,
        owner: &str,
        repo: &str,
        tag_name: &str,
        title: &str,
    ) -> Result<u64> {
        self.created.borrow_mut().push(CreatedRelease {
            owner: owner.to_string(),
            repo: repo.to_string(),
            tag_name: tag_name.to_string(),
            title: title.to_string(),
        });
        Ok(self.next_id)
    }

    fn upload_asset(
        &self,
        _owner: &str,
        _repo: &str,
        release_id: u64,
        file_path: &Path,
    ) -> Result<()> {
        if self.fail_upload {
            return Err(ReleaseError::Forge {
                status: 500,
                body: "upload failed".to_string(),
            });
        }
        if !file_path.is_file() {
            return Err(ReleaseError::package(format!(
                "{} does not exist",
                file_path.display()
            )));
        }
        self.uploads
            .borrow_mut()
            .push((release_id, file_path.to_path_buf()));
        Ok(())
    }
}
