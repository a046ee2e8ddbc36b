//! Terminal output for the release run.
//!
//! Status lines go to stdout, errors to stderr. Colors are dropped
//! automatically when the stream is not a terminal.

use console::style;
use std::path::Path;

use crate::version::Version;

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Show the old and new version side by side.
pub fn display_version_bump(old: &Version, new: &Version) {
    println!(
        "{} Version increased to {} (was {})",
        style("✓").green(),
        style(new).green().bold(),
        style(old).dim()
    );
}

/// Final summary once the asset is uploaded.
///
/// The local archive is gone by then, so only its file name is shown.
pub fn display_release_summary(version: &Version, release_id: u64, archive: &Path) {
    println!("\n{}", release_summary(version, release_id, archive));
}

fn release_summary(version: &Version, release_id: u64, archive: &Path) -> String {
    let asset = archive
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| archive.to_string_lossy());

    format!(
        "{}\n  Release id: {}\n  Uploaded:   {}",
        style(format!("Released {}", version)).bold(),
        release_id,
        asset
    )
}
