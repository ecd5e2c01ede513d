//! Sqlext Bundle - Precompiled SQLite extension bundle management
//!
//! This crate resolves, verifies, and installs precompiled native extension
//! binaries for SQLite across operating system/architecture combinations.
//! A JSON manifest is the sole source of truth for which extensions exist
//! and what their expected content hashes are; the installer copies only
//! binaries whose SHA-256 digest matches the manifest into the directory
//! the engine loads from.
//!
//! # Features
//!
//! - **Manifest catalog**: load-or-initialize a JSON catalog of every known
//!   extension and its per-platform build metadata
//! - **Integrity gate**: every binary is hashed in full and checked against
//!   the manifest before it is installed, never after
//! - **Idempotent installs**: atomic copies; re-runs converge to the same
//!   install directory contents
//! - **Partial success**: platform builds lag behind the catalog; missing
//!   bundles are reported, not raised
//!
//! # Examples
//!
//! ```no_run
//! use sqlext_bundle::{BundleInstaller, BundleLayout, ManifestStore, PlatformKey};
//!
//! # fn example() -> sqlext_bundle::Result<()> {
//! let layout = BundleLayout::new("./extensions");
//! let store = ManifestStore::load(layout.manifest_path())?;
//!
//! let installer = BundleInstaller::new(PlatformKey::detect()?, layout);
//! let report = installer.install(store.manifest())?;
//! println!("installed {} extensions", report.installed.len());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod installer;
pub mod layout;
pub mod manifest;
pub mod models;
pub mod platform;
pub mod store;

// Re-export commonly used types
pub use catalog::ExtensionId;
pub use error::{BundleError, Result};
pub use installer::BundleInstaller;
pub use layout::BundleLayout;
pub use manifest::{
    checksum, ExtensionRecord, Manifest, VariantRecord, MANIFEST_FORMAT_VERSION,
};
pub use models::{ExtensionInfo, InstallIssue, InstallIssueKind, InstallOptions, InstallReport};
pub use platform::PlatformKey;
pub use store::ManifestStore;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Open the manifest under `base_dir` and build an installer for the host
/// platform, creating the default catalog on first use.
pub fn init_default(base_dir: std::path::PathBuf) -> Result<(ManifestStore, BundleInstaller)> {
    let layout = BundleLayout::new(base_dir);
    let store = ManifestStore::load(layout.manifest_path())?;
    let installer = BundleInstaller::new(PlatformKey::detect()?, layout);
    Ok((store, installer))
}
