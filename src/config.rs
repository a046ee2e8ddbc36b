use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ReleaseError, Result};

/// Project file that may override the built-in release layout.
pub const PROJECT_CONFIG_FILE: &str = "release.toml";

/// Location of the forge credentials, relative to the user's home directory.
pub const CREDENTIALS_FILE: &str = ".config/gitea_token.toml";

/// Fixed release layout and forge target for the application.
///
/// Every field defaults to the layout of the shadow desktop app, so an absent
/// `release.toml` yields a working configuration.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReleaseConfig {
    /// JSON file holding `package.version`
    pub version_file: PathBuf,

    /// Executable produced by the build command
    pub release_target: PathBuf,

    /// Runtime dependencies copied to `third-party/` in the archive
    pub third_party_dir: PathBuf,

    /// Application data copied to `data/` in the archive
    pub data_dir: PathBuf,

    /// Shell command producing `release_target`
    pub build_command: String,

    /// Archive name prefix, the archive is `<prefix>-<version>.zip`
    pub archive_prefix: String,

    pub owner: String,
    pub repo: String,
    pub remote: String,

    /// Timeout applied to forge API calls other than the asset upload
    pub http_timeout_secs: u64,

    /// Timeout for the asset upload, unbounded when unset
    pub upload_timeout_secs: Option<u64>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            version_file: PathBuf::from("src-tauri").join("tauri.conf.json"),
            release_target: PathBuf::from("src-tauri")
                .join("target")
                .join("release")
                .join("shadow.exe"),
            third_party_dir: PathBuf::from("third_party"),
            data_dir: PathBuf::from("data"),
            build_command: "cargo tauri build".to_string(),
            archive_prefix: "shadow".to_string(),
            owner: "shadow".to_string(),
            repo: "shadow".to_string(),
            remote: "origin".to_string(),
            http_timeout_secs: 300,
            upload_timeout_secs: None,
        }
    }
}

/// Loads the release configuration or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release.toml` in current directory
/// 3. Default configuration if no file found
///
/// # Returns
/// * `Ok(ReleaseConfig)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<ReleaseConfig> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(PROJECT_CONFIG_FILE).exists() {
        fs::read_to_string(PROJECT_CONFIG_FILE)?
    } else {
        return Ok(ReleaseConfig::default());
    };

    let config: ReleaseConfig = toml::from_str(&config_str)?;
    Ok(config)
}

/// Base URL and access token for the forge API.
#[derive(Clone, PartialEq)]
pub struct ForgeCredentials {
    pub url: String,
    pub token: String,
}

impl fmt::Debug for ForgeCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForgeCredentials")
            .field("url", &self.url)
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Deserialize)]
struct CredentialsFile {
    gitea: Option<GiteaSection>,
}

#[derive(Deserialize)]
struct GiteaSection {
    url: Option<String>,
    token: Option<String>,
}

/// Returns `~/.config/gitea_token.toml`.
pub fn default_credentials_path() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(CREDENTIALS_FILE))
        .ok_or_else(|| ReleaseError::config("Cannot determine the home directory"))
}

/// Loads forge credentials from the `[gitea]` section of a TOML file.
///
/// Reads the given path, or `~/.config/gitea_token.toml` when `None`.
pub fn load_credentials(path: Option<&Path>) -> Result<ForgeCredentials> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_credentials_path()?,
    };

    let content = fs::read_to_string(&path).map_err(|e| {
        ReleaseError::config(format!(
            "Cannot read credentials file {}: {}",
            path.display(),
            e
        ))
    })?;
    let file: CredentialsFile = toml::from_str(&content)?;

    let section = file.gitea.ok_or_else(|| {
        ReleaseError::config(format!("{} has no [gitea] section", path.display()))
    })?;
    let url = section
        .url
        .ok_or_else(|| ReleaseError::config("[gitea] url is missing"))?;
    let token = section
        .token
        .ok_or_else(|| ReleaseError::config("[gitea] token is missing"))?;

    Ok(ForgeCredentials {
        url: url.trim_end_matches('/').to_string(),
        token,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_layout() {
        let config = ReleaseConfig::default();
        assert_eq!(
            config.version_file,
            Path::new("src-tauri").join("tauri.conf.json")
        );
        assert_eq!(config.build_command, "cargo tauri build");
        assert_eq!(config.owner, "shadow");
        assert_eq!(config.repo, "shadow");
        assert_eq!(config.remote, "origin");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: ReleaseConfig = toml::from_str(
            r#"
            build_command = "make release"
            http_timeout_secs = 30
            "#,
        )
        .unwrap();

        assert_eq!(config.build_command, "make release");
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.upload_timeout_secs, None);
        assert_eq!(config.archive_prefix, "shadow");
        assert_eq!(config.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_upload_timeout_is_separate() {
        let config: ReleaseConfig = toml::from_str("upload_timeout_secs = 3600").unwrap();

        assert_eq!(config.upload_timeout_secs, Some(3600));
        assert_eq!(config.http_timeout_secs, 300);
    }

    #[test]
    fn test_load_credentials() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gitea_token.toml");
        fs::write(
            &path,
            "[gitea]\nurl = \"https://git.example.com/\"\ntoken = \"abc123\"\n",
        )
        .unwrap();

        let creds = load_credentials(Some(&path)).unwrap();
        assert_eq!(creds.url, "https://git.example.com");
        assert_eq!(creds.token, "abc123");
    }

    #[test]
    fn test_load_credentials_missing_section() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gitea_token.toml");
        fs::write(&path, "[github]\ntoken = \"abc\"\n").unwrap();

        let err = load_credentials(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("[gitea]"));
    }

    #[test]
    fn test_load_credentials_missing_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gitea_token.toml");
        fs::write(&path, "[gitea]\nurl = \"https://git.example.com\"\n").unwrap();

        assert!(matches!(
            load_credentials(Some(&path)),
            Err(ReleaseError::Config(_))
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_token() {
        let creds = ForgeCredentials {
            url: "https://git.example.com".to_string(),
            token: "super-secret".to_string(),
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("git.example.com"));
    }
}
