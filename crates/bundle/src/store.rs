use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{BundleError, Result};
use crate::manifest::{Manifest, MANIFEST_FORMAT_VERSION};

/// Loads, owns, and persists the extension manifest.
///
/// The manifest is read once at construction, mutated only through
/// [`ManifestStore::update`], and rewritten to disk on every mutation.
/// The store has no side effects beyond the file at its path.
pub struct ManifestStore {
    path: PathBuf,
    manifest: Manifest,
}

impl ManifestStore {
    /// Read the manifest at `path`, or synthesize and persist the default
    /// catalog when no file exists there yet.
    ///
    /// A file that exists but does not parse into the documented schema
    /// fails with [`BundleError::CorruptManifest`]; it is never silently
    /// replaced with a default.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            info!(
                "No manifest found at {}, writing default catalog",
                path.display()
            );
            let store = Self {
                path,
                manifest: Manifest::default_catalog(),
            };
            store.save()?;
            return Ok(store);
        }

        let content = fs::read_to_string(&path).map_err(|e| BundleError::IoOperation {
            operation: "read manifest".to_string(),
            path: path.clone(),
            source: e,
        })?;

        let manifest: Manifest =
            serde_json::from_str(&content).map_err(|e| BundleError::CorruptManifest {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        if manifest.format_version != MANIFEST_FORMAT_VERSION {
            warn!(
                "Manifest at {} has format version '{}', expected '{}'",
                path.display(),
                manifest.format_version,
                MANIFEST_FORMAT_VERSION
            );
        }

        debug!(
            "Loaded manifest with {} extensions from {}",
            manifest.extensions.len(),
            path.display()
        );
        Ok(Self { path, manifest })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    /// Apply a mutation and rewrite the manifest on disk.
    ///
    /// This is the hook the build pipeline uses to record variant digests
    /// after producing fresh binaries.
    pub fn update<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Manifest),
    {
        f(&mut self.manifest);
        self.save()
    }

    /// Serialize the manifest to its path, writing to a temporary file in
    /// the same directory and renaming it over the old document so an
    /// interrupted process never leaves a half-written manifest behind.
    pub fn save(&self) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.manifest)?;

        let dir = self.path.parent().ok_or_else(|| {
            BundleError::Config(format!(
                "Manifest path '{}' has no parent directory",
                self.path.display()
            ))
        })?;
        fs::create_dir_all(dir).map_err(|e| BundleError::IoOperation {
            operation: "create manifest directory".to_string(),
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut tmp =
            tempfile::NamedTempFile::new_in(dir).map_err(|e| BundleError::IoOperation {
                operation: "create manifest temp file".to_string(),
                path: dir.to_path_buf(),
                source: e,
            })?;
        tmp.write_all(content.as_bytes())
            .map_err(|e| BundleError::IoOperation {
                operation: "write manifest".to_string(),
                path: tmp.path().to_path_buf(),
                source: e,
            })?;
        tmp.persist(&self.path).map_err(|e| BundleError::IoOperation {
            operation: "persist manifest".to_string(),
            path: self.path.clone(),
            source: e.error,
        })?;

        debug!("Manifest saved to {}", self.path.display());
        Ok(())
    }
}
