use std::path::{Path, PathBuf};

use crate::error::{BundleError, Result};
use crate::platform::PlatformKey;

/// Name of the manifest document inside the base directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Subdirectory of the base directory holding staged platform bundles.
pub const BUNDLES_DIR: &str = "bundles";

/// Filesystem layout under one base directory:
///
/// ```text
/// <base>/
/// ├── manifest.json
/// ├── bundles/<platform>/<name><suffix>   # staged binaries
/// └── <platform>/<name><suffix>           # install target, the engine loads from here
/// ```
///
/// The base directory is injected configuration; nothing in this crate
/// falls back to a process-wide path on its own.
#[derive(Debug, Clone)]
pub struct BundleLayout {
    base_dir: PathBuf,
}

impl BundleLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Layout rooted at the OS-specific data directory for this tool.
    pub fn with_default_base_dir() -> Result<Self> {
        Ok(Self::new(Self::default_base_dir()?))
    }

    /// The documented default base directory for the current OS.
    ///
    /// Returns an error if the system directories cannot be determined.
    pub fn default_base_dir() -> Result<PathBuf> {
        use directories::ProjectDirs;

        let project_dirs = ProjectDirs::from("org", "sqlext", "sqlext").ok_or_else(|| {
            BundleError::Config(
                "Could not determine system directories for current user/OS".to_string(),
            )
        })?;

        Ok(project_dirs.data_local_dir().join("extensions"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.base_dir.join(MANIFEST_FILE)
    }

    /// Staging directory holding the binaries bundled for `platform`.
    pub fn bundle_dir(&self, platform: PlatformKey) -> PathBuf {
        self.base_dir.join(BUNDLES_DIR).join(platform.as_str())
    }

    /// Directory the engine loads `platform` extensions from, sibling of
    /// the staging tree.
    pub fn install_dir(&self, platform: PlatformKey) -> PathBuf {
        self.base_dir.join(platform.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_hang_off_base_dir() {
        let layout = BundleLayout::new("/data/sqlext");

        assert_eq!(layout.manifest_path(), Path::new("/data/sqlext/manifest.json"));
        assert_eq!(
            layout.bundle_dir(PlatformKey::LinuxArm64),
            Path::new("/data/sqlext/bundles/linux-arm64")
        );
        assert_eq!(
            layout.install_dir(PlatformKey::LinuxArm64),
            Path::new("/data/sqlext/linux-arm64")
        );
    }

    #[test]
    fn test_default_base_dir_structure() {
        match BundleLayout::default_base_dir() {
            Ok(default_dir) => {
                assert_eq!(default_dir.file_name().unwrap(), "extensions");
                assert!(default_dir.to_string_lossy().contains("sqlext"));
            }
            Err(_) => {
                // Acceptable on systems where user directories cannot be determined
            }
        }
    }
}
