use thiserror::Error;

/// Unified error type for release operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Git repository is dirty: {0}")]
    DirtyTree(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Push failed: {0}")]
    Push(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Build failed: {0}")]
    Build(String),

    #[error("Packaging failed: {0}")]
    Package(String),

    #[error("Forge request failed with status {status}: {body}")]
    Forge { status: u16, body: String },

    #[error("Release for tag '{0}' already exists")]
    ReleaseExists(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in shadow-release
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a dirty working tree error with context
    pub fn dirty(msg: impl Into<String>) -> Self {
        ReleaseError::DirtyTree(msg.into())
    }

    /// Create a push error with context
    pub fn push(msg: impl Into<String>) -> Self {
        ReleaseError::Push(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        ReleaseError::Version(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a build error with context
    pub fn build(msg: impl Into<String>) -> Self {
        ReleaseError::Build(msg.into())
    }

    /// Create a packaging error with context
    pub fn package(msg: impl Into<String>) -> Self {
        ReleaseError::Package(msg.into())
    }
}
