use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::catalog::ExtensionId;
use crate::error::{BundleError, Result};
use crate::layout::BundleLayout;
use crate::manifest::{checksum, Manifest};
use crate::models::{ExtensionInfo, InstallIssue, InstallIssueKind, InstallOptions, InstallReport};
use crate::platform::PlatformKey;

/// Selects, verifies, and installs the extension binaries applicable to
/// one platform.
///
/// Everything the installer touches is injected: the platform key, the
/// directory layout, and the manifest passed to each call.
pub struct BundleInstaller {
    platform: PlatformKey,
    layout: BundleLayout,
}

impl BundleInstaller {
    pub fn new(platform: PlatformKey, layout: BundleLayout) -> Self {
        Self { platform, layout }
    }

    pub fn platform(&self) -> PlatformKey {
        self.platform
    }

    /// Staging directory the bundles for this platform are expected in.
    pub fn bundle_dir(&self) -> PathBuf {
        self.layout.bundle_dir(self.platform)
    }

    /// Directory verified binaries are installed into.
    pub fn install_dir(&self) -> PathBuf {
        self.layout.install_dir(self.platform)
    }

    /// Extensions from `manifest` with a built variant for this installer's
    /// platform, in manifest order.
    pub fn list_available(&self, manifest: &Manifest) -> Vec<ExtensionInfo> {
        manifest
            .extensions
            .keys()
            .filter_map(|&id| manifest.info(id, self.platform))
            .collect()
    }

    /// Check a file on disk against the digest the manifest records for
    /// `id` on this platform.
    ///
    /// Returns false instead of erroring when the file is missing or
    /// unreadable, when the manifest has no record for `id`, or when no
    /// variant has been built for this platform. The full file contents
    /// are hashed; this is the only integrity gate before a binary is
    /// installed.
    pub fn verify(&self, manifest: &Manifest, id: ExtensionId, file: &Path) -> bool {
        let Some(info) = manifest.info(id, self.platform) else {
            return false;
        };

        match checksum::sha256_file(file) {
            Ok(actual) => checksum::digests_match(&info.sha256, &actual),
            Err(e) => {
                debug!("Could not hash {}: {}", file.display(), e);
                false
            }
        }
    }

    /// Install every available extension with default options.
    pub fn install(&self, manifest: &Manifest) -> Result<InstallReport> {
        self.install_with(manifest, &InstallOptions::default())
    }

    /// Copy every verified extension binary from the bundle directory into
    /// the install directory.
    ///
    /// Extensions whose bundle is missing, fails verification, or cannot
    /// be copied are skipped and reported; one extension's outcome never
    /// affects another. A target that already holds a verified copy is
    /// reported as up to date and left alone unless
    /// [`InstallOptions::force_reinstall`] is set. Only an unusable
    /// install directory aborts the run.
    pub fn install_with(
        &self,
        manifest: &Manifest,
        options: &InstallOptions,
    ) -> Result<InstallReport> {
        let target_dir = self.install_dir();
        fs::create_dir_all(&target_dir).map_err(|e| BundleError::TargetUnwritable {
            path: target_dir.clone(),
            source: e,
        })?;

        let bundle_dir = self.bundle_dir();
        let mut report = InstallReport::new(target_dir.clone());

        for info in self.list_available(manifest) {
            let file_name = info.file_name();
            let source = bundle_dir.join(&file_name);
            let target = target_dir.join(&file_name);

            if !options.force_reinstall && self.verify(manifest, info.id, &target) {
                debug!("{} already installed at {}", info.id, target.display());
                report.up_to_date.push(info);
                continue;
            }

            if !source.exists() {
                warn!("No bundle for {} at {}", info.id, source.display());
                report.skipped.push(InstallIssue {
                    extension: info.id,
                    kind: InstallIssueKind::MissingBundle,
                    detail: format!("expected bundle at {}", source.display()),
                });
                continue;
            }

            if !self.verify(manifest, info.id, &source) {
                warn!(
                    "Digest mismatch for {} at {}, refusing to install",
                    info.id,
                    source.display()
                );
                report.skipped.push(InstallIssue {
                    extension: info.id,
                    kind: InstallIssueKind::IntegrityMismatch,
                    detail: format!(
                        "{} does not match manifest digest {}",
                        source.display(),
                        info.sha256
                    ),
                });
                continue;
            }

            match copy_atomic(&source, &target_dir, &file_name) {
                Ok(()) => {
                    info!("Installed {}@{} to {}", info.id, info.version, target.display());
                    report.installed.push(info);
                }
                Err(e) => {
                    warn!(
                        "Failed to copy {} into {}: {}",
                        info.id,
                        target_dir.display(),
                        e
                    );
                    report.skipped.push(InstallIssue {
                        extension: info.id,
                        kind: InstallIssueKind::CopyFailed,
                        detail: e.to_string(),
                    });
                }
            }
        }

        Ok(report)
    }
}

/// Copy `source` to `dir/<file_name>` through a temporary file in `dir`,
/// carrying over the source permissions, so a concurrently reading process
/// never observes a partially written binary.
fn copy_atomic(source: &Path, dir: &Path, file_name: &str) -> io::Result<()> {
    let mut reader = fs::File::open(source)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    io::copy(&mut reader, tmp.as_file_mut())?;

    let permissions = fs::metadata(source)?.permissions();
    tmp.as_file().set_permissions(permissions)?;

    tmp.persist(dir.join(file_name)).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PLATFORM: PlatformKey = PlatformKey::LinuxX86;

    fn installer(temp_dir: &TempDir) -> BundleInstaller {
        BundleInstaller::new(PLATFORM, BundleLayout::new(temp_dir.path()))
    }

    fn manifest_with(entries: &[(ExtensionId, &[u8])]) -> Manifest {
        let mut manifest = Manifest::default_catalog();
        for (id, content) in entries {
            let record = manifest.extensions.get_mut(id).unwrap();
            let variant = record.platforms.get_mut(&PLATFORM).unwrap();
            variant.version = "1.2.0".to_string();
            variant.sha256 = Some(checksum::sha256_hex(content));
        }
        manifest
    }

    fn stage_bundle(temp_dir: &TempDir, file_name: &str, content: &[u8]) {
        let dir = temp_dir.path().join("bundles").join(PLATFORM.as_str());
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(file_name), content).unwrap();
    }

    #[test]
    fn test_list_available_excludes_null_hashes() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_with(&[(ExtensionId::Fts5, b"AAAA")]);

        let available = installer(&temp_dir).list_available(&manifest);

        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, ExtensionId::Fts5);
    }

    #[test]
    fn test_list_available_is_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_with(&[
            (ExtensionId::Compress, b"compress"),
            (ExtensionId::Fts5, b"fts5"),
            (ExtensionId::Rtree, b"rtree"),
        ]);
        let installer = installer(&temp_dir);

        let first: Vec<_> = installer
            .list_available(&manifest)
            .into_iter()
            .map(|info| info.id)
            .collect();
        let second: Vec<_> = installer
            .list_available(&manifest)
            .into_iter()
            .map(|info| info.id)
            .collect();

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_verify_rejects_missing_and_unknown() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = manifest_with(&[(ExtensionId::Fts5, b"AAAA")]);
        let installer = installer(&temp_dir);

        stage_bundle(&temp_dir, "fts5.so", b"AAAA");
        let staged = temp_dir
            .path()
            .join("bundles")
            .join(PLATFORM.as_str())
            .join("fts5.so");

        // Matching file verifies
        assert!(installer.verify(&manifest, ExtensionId::Fts5, &staged));

        // Nonexistent path
        assert!(!installer.verify(&manifest, ExtensionId::Fts5, Path::new("/nonexistent")));

        // No available variant for this platform
        assert!(!installer.verify(&manifest, ExtensionId::Json1, &staged));

        // Id without a manifest record at all
        manifest.extensions.remove(&ExtensionId::Fts5);
        assert!(!installer.verify(&manifest, ExtensionId::Fts5, &staged));
    }

    #[test]
    fn test_verify_rejects_tampered_file() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_with(&[(ExtensionId::Fts5, b"AAAA")]);
        let installer = installer(&temp_dir);

        stage_bundle(&temp_dir, "fts5.so", b"BBBB");
        let staged = temp_dir
            .path()
            .join("bundles")
            .join(PLATFORM.as_str())
            .join("fts5.so");

        assert!(!installer.verify(&manifest, ExtensionId::Fts5, &staged));
    }

    #[test]
    fn test_verify_is_case_insensitive_on_digests() {
        let temp_dir = TempDir::new().unwrap();
        let mut manifest = manifest_with(&[(ExtensionId::Fts5, b"AAAA")]);
        let record = manifest.extensions.get_mut(&ExtensionId::Fts5).unwrap();
        let variant = record.platforms.get_mut(&PLATFORM).unwrap();
        let upper = variant.sha256.take().unwrap().to_uppercase();
        variant.sha256 = Some(upper);

        stage_bundle(&temp_dir, "fts5.so", b"AAAA");
        let staged = temp_dir
            .path()
            .join("bundles")
            .join(PLATFORM.as_str())
            .join("fts5.so");

        assert!(installer(&temp_dir).verify(&manifest, ExtensionId::Fts5, &staged));
    }

    #[test]
    fn test_install_copies_verified_bundle() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_with(&[(ExtensionId::Fts5, b"AAAA")]);
        stage_bundle(&temp_dir, "fts5.so", b"AAAA");

        let report = installer(&temp_dir).install(&manifest).unwrap();

        assert_eq!(report.installed.len(), 1);
        assert!(report.is_complete());
        let installed = temp_dir.path().join(PLATFORM.as_str()).join("fts5.so");
        assert_eq!(fs::read(installed).unwrap(), b"AAAA");
    }

    #[test]
    fn test_install_skips_tampered_bundle() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_with(&[(ExtensionId::Fts5, b"AAAA")]);
        stage_bundle(&temp_dir, "fts5.so", b"BBBB");

        let report = installer(&temp_dir).install(&manifest).unwrap();

        assert!(report.installed.is_empty());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].kind, InstallIssueKind::IntegrityMismatch);
        assert!(!temp_dir.path().join(PLATFORM.as_str()).join("fts5.so").exists());
    }

    #[test]
    fn test_install_reports_missing_bundle() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_with(&[(ExtensionId::Fts5, b"AAAA")]);

        let report = installer(&temp_dir).install(&manifest).unwrap();

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].kind, InstallIssueKind::MissingBundle);
    }

    #[test]
    fn test_install_isolates_failures() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_with(&[
            (ExtensionId::Fts5, b"good"),
            (ExtensionId::Json1, b"expected"),
        ]);
        stage_bundle(&temp_dir, "fts5.so", b"good");
        stage_bundle(&temp_dir, "json1.so", b"tampered");

        let report = installer(&temp_dir).install(&manifest).unwrap();

        assert_eq!(report.installed.len(), 1);
        assert_eq!(report.installed[0].id, ExtensionId::Fts5);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].extension, ExtensionId::Json1);
    }

    #[test]
    fn test_install_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_with(&[(ExtensionId::Fts5, b"AAAA")]);
        stage_bundle(&temp_dir, "fts5.so", b"AAAA");
        let installer = installer(&temp_dir);

        let first = installer.install(&manifest).unwrap();
        assert_eq!(first.installed.len(), 1);

        let second = installer.install(&manifest).unwrap();
        assert!(second.installed.is_empty());
        assert_eq!(second.up_to_date.len(), 1);

        let installed = temp_dir.path().join(PLATFORM.as_str()).join("fts5.so");
        assert_eq!(fs::read(installed).unwrap(), b"AAAA");
    }

    #[test]
    fn test_force_reinstall_recopies() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_with(&[(ExtensionId::Fts5, b"AAAA")]);
        stage_bundle(&temp_dir, "fts5.so", b"AAAA");
        let installer = installer(&temp_dir);

        installer.install(&manifest).unwrap();

        let options = InstallOptions {
            force_reinstall: true,
        };
        let report = installer.install_with(&manifest, &options).unwrap();
        assert_eq!(report.installed.len(), 1);
        assert!(report.up_to_date.is_empty());
    }

    #[test]
    fn test_stale_target_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = manifest_with(&[(ExtensionId::Fts5, b"AAAA")]);
        stage_bundle(&temp_dir, "fts5.so", b"AAAA");

        // Target holds a binary from an older build
        let target_dir = temp_dir.path().join(PLATFORM.as_str());
        fs::create_dir_all(&target_dir).unwrap();
        fs::write(target_dir.join("fts5.so"), b"old build").unwrap();

        let report = installer(&temp_dir).install(&manifest).unwrap();

        assert_eq!(report.installed.len(), 1);
        assert_eq!(fs::read(target_dir.join("fts5.so")).unwrap(), b"AAAA");
    }
}
