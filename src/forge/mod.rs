//! Forge release API
//!
//! [Forge] is what the release workflow publishes through. [GiteaClient]
//! talks to a Gitea-compatible REST API; [MockForge] records calls for tests.

pub mod client;
pub mod mock;

pub use client::GiteaClient;
pub use mock::MockForge;

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Release operations on a forge repository
pub trait Forge {
    /// Looks up the release attached to `tag_name`, if any
    fn find_release(&self, owner: &str, repo: &str, tag_name: &str) -> Result<Option<u64>>;

    /// Creates a release for `tag_name` and returns its id
    fn create_release(&self, owner: &str, repo: &str, tag_name: &str, title: &str)
        -> Result<u64>;

    /// Attaches the file at `file_path` to an existing release
    fn upload_asset(&self, owner: &str, repo: &str, release_id: u64, file_path: &Path)
        -> Result<()>;
}

/// Body of `POST /repos/{owner}/{repo}/releases`
#[derive(Debug, Serialize, PartialEq)]
pub struct CreateRelease<'a> {
    pub tag_name: &'a str,
    pub name: &'a str,
    pub body: String,
}

impl<'a> CreateRelease<'a> {
    pub fn new(tag_name: &'a str, name: &'a str) -> Self {
        CreateRelease {
            tag_name,
            name,
            body: release_body(tag_name),
        }
    }
}

/// The subset of a release response the workflow reads
#[derive(Debug, Deserialize, PartialEq)]
pub struct ReleaseRecord {
    pub id: u64,
}

/// Description attached to every release
pub fn release_body(tag_name: &str) -> String {
    format!("Release for version {}", tag_name)
}

pub fn releases_path(owner: &str, repo: &str) -> String {
    format!("/api/v1/repos/{}/{}/releases", owner, repo)
}

pub fn release_by_tag_path(owner: &str, repo: &str, tag_name: &str) -> String {
    format!("{}/tags/{}", releases_path(owner, repo), tag_name)
}

pub fn assets_path(owner: &str, repo: &str, release_id: u64) -> String {
    format!("{}/{}/assets", releases_path(owner, repo), release_id)
}
