use shadow_release::config::ReleaseConfig;
use shadow_release::package::pack_release;
use shadow_release::version::Version;
use shadow_release::ReleaseError;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tempfile::TempDir;

// Lays out a built binary plus the two runtime trees under `root`
fn release_layout(root: &Path) -> ReleaseConfig {
    let target = root.join("src-tauri/target/release");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("shadow.exe"), b"MZ-binary").unwrap();

    let third_party = root.join("third_party");
    fs::create_dir_all(third_party.join("7z")).unwrap();
    fs::write(third_party.join("7z/7z.exe"), b"7z").unwrap();
    fs::write(third_party.join("7z/7z.dll"), b"dll").unwrap();
    fs::write(third_party.join("README.txt"), b"licenses").unwrap();

    let data = root.join("data");
    fs::create_dir_all(data.join("presets")).unwrap();
    fs::write(data.join("presets/default.json"), b"{}").unwrap();

    ReleaseConfig {
        release_target: target.join("shadow.exe"),
        third_party_dir: third_party,
        data_dir: data,
        ..ReleaseConfig::default()
    }
}

fn archive_files(path: &Path) -> BTreeSet<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    archive
        .file_names()
        .filter(|name| !name.ends_with('/'))
        .map(str::to_string)
        .collect()
}

fn zip_files_in(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.ends_with(".zip"))
        .collect()
}

#[test]
fn test_pack_release_contents() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config = release_layout(project.path());

    let archive = pack_release(&config, &Version::new(0, 1, 1), output.path()).unwrap();

    assert_eq!(archive, output.path().join("shadow-0.1.1.zip"));
    let expected: BTreeSet<String> = [
        "shadow.exe",
        "third-party/7z/7z.exe",
        "third-party/7z/7z.dll",
        "third-party/README.txt",
        "data/presets/default.json",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    assert_eq!(archive_files(&archive), expected);
}

#[test]
fn test_pack_release_preserves_file_contents() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config = release_layout(project.path());

    let archive = pack_release(&config, &Version::new(2, 0, 0), output.path()).unwrap();

    let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
    let mut binary = Vec::new();
    zip.by_name("shadow.exe")
        .unwrap()
        .read_to_end(&mut binary)
        .unwrap();
    assert_eq!(binary, b"MZ-binary");
}

#[test]
fn test_only_the_archive_is_left_in_output() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config = release_layout(project.path());

    pack_release(&config, &Version::new(0, 3, 0), output.path()).unwrap();

    let entries: Vec<_> = fs::read_dir(output.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(zip_files_in(output.path()), vec!["shadow-0.3.0.zip".to_string()]);
}

#[test]
fn test_missing_data_dir_fails_without_archive() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config = release_layout(project.path());
    fs::remove_dir_all(&config.data_dir).unwrap();

    let err = pack_release(&config, &Version::new(0, 1, 1), output.path()).unwrap_err();

    assert!(matches!(err, ReleaseError::Package(_)));
    assert!(err.to_string().contains("data"));
    assert!(zip_files_in(output.path()).is_empty());
}

#[test]
fn test_missing_third_party_dir_fails_without_archive() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config = release_layout(project.path());
    fs::remove_dir_all(&config.third_party_dir).unwrap();

    assert!(pack_release(&config, &Version::new(0, 1, 1), output.path()).is_err());
    assert!(fs::read_dir(output.path()).unwrap().next().is_none());
}

#[test]
fn test_missing_binary_fails_without_archive() {
    let project = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    let config = release_layout(project.path());
    fs::remove_file(&config.release_target).unwrap();

    let err = pack_release(&config, &Version::new(0, 1, 1), output.path()).unwrap_err();
    assert!(err.to_string().contains("shadow.exe"));
    assert!(zip_files_in(output.path()).is_empty());
}
