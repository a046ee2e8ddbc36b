//! Release workflow
//!
//! Runs the release steps in a fixed order, stopping at the first failure:
//!
//! 1. Refuse to start on a dirty working tree
//! 2. Compute the next version and make sure the forge has no release for it
//! 3. Persist the new version
//! 4. Build
//! 5. Package the archive
//! 6. Commit and push the version file
//! 7. Create the release and upload the archive
//! 8. Delete the local archive
//!
//! Everything up to packaging is local. Nothing is rolled back: if a later
//! step fails the version file stays bumped (and possibly pushed) and the
//! archive is kept on disk for a manual upload.

use std::fs;
use std::path::{Path, PathBuf};

use crate::builder::Builder;
use crate::config::ReleaseConfig;
use crate::error::{ReleaseError, Result};
use crate::forge::Forge;
use crate::git::SourceControl;
use crate::package::pack_release;
use crate::ui;
use crate::version::{increase_version, Component, Version, VersionFile};

/// Result of a successful release
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    /// Version before the bump
    pub previous: Version,

    /// The version that was released
    pub version: Version,

    /// Forge id of the created release
    pub release_id: u64,

    /// Where the uploaded archive was written (deleted after upload)
    pub archive: PathBuf,
}

/// Collaborators for one release run
pub struct ReleaseWorkflow<'a, S, F, B> {
    pub config: &'a ReleaseConfig,
    pub git: &'a S,
    pub forge: &'a F,
    pub builder: &'a B,
    /// Directory receiving the archive
    pub output_dir: &'a Path,
}

/// Commit message recorded for the version bump
pub fn commit_message(version: &Version) -> String {
    format!("Version increased to {}", version)
}

/// Human-readable release title
pub fn release_title(version: &Version) -> String {
    format!("Release for version {}", version)
}

impl<S, F, B> ReleaseWorkflow<'_, S, F, B>
where
    S: SourceControl,
    F: Forge,
    B: Builder,
{
    /// Main release workflow
    ///
    /// # Arguments
    ///
    /// * `component` - The version component to increment
    ///
    /// # Returns
    ///
    /// The released version and release id, or the first error encountered
    pub fn run(&self, component: Component) -> Result<ReleaseOutcome> {
        let config = self.config;

        ui::display_status("Checking working tree...");
        self.git.assert_clean()?;

        let version_file = VersionFile::new(&config.version_file);
        let previous = version_file.get_version()?;
        let version = increase_version(previous, component)?;
        let tag = version.to_string();

        if let Some(id) = self.forge.find_release(&config.owner, &config.repo, &tag)? {
            tracing::debug!(id, %tag, "release already on forge");
            return Err(ReleaseError::ReleaseExists(tag));
        }

        version_file.set_version(version)?;
        ui::display_version_bump(&previous, &version);

        ui::display_status(&format!("Building with '{}'...", config.build_command));
        self.builder.build()?;
        ui::display_success("Build finished");

        ui::display_status("Packing release...");
        let archive = pack_release(config, &version, self.output_dir)?;
        ui::display_success(&format!("Packed {}", archive.display()));

        ui::display_status(&format!("Pushing version bump to {}...", config.remote));
        self.git.add(&config.version_file)?;
        self.git.commit(&commit_message(&version))?;
        self.git.push()?;
        ui::display_success("Version bump pushed");

        let release_id =
            self.forge
                .create_release(&config.owner, &config.repo, &tag, &release_title(&version))?;
        ui::display_success(&format!("Release created with id {}", release_id));

        self.forge
            .upload_asset(&config.owner, &config.repo, release_id, &archive)?;
        ui::display_success("Asset uploaded");

        fs::remove_file(&archive)?;

        Ok(ReleaseOutcome {
            previous,
            version,
            release_id,
            archive,
        })
    }
}
