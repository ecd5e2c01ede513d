use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Manifest at '{path}' is corrupt: {reason}")]
    CorruptManifest { path: PathBuf, reason: String },

    #[error("Install directory '{path}' is not usable: {source}")]
    TargetUnwritable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No extension catalog entry matches host platform {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    #[error("Unknown extension '{0}'")]
    UnknownExtension(String),

    #[error("Unknown platform key '{0}'")]
    UnknownPlatform(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("IO operation '{operation}' failed on path '{path}': {source}")]
    IoOperation {
        operation: String,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid version format: {0}")]
    InvalidVersion(#[from] semver::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, BundleError>;

impl BundleError {
    /// Errors the caller caused rather than the environment.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            BundleError::UnknownExtension(_)
                | BundleError::UnknownPlatform(_)
                | BundleError::InvalidVersion(_)
                | BundleError::Config(_)
        )
    }
}
