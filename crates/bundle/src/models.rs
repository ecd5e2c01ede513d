use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ExtensionId;
use crate::platform::PlatformKey;

/// Resolved view of one extension on one platform: the manifest record
/// joined with the variant actually built for that platform.
///
/// Returned to callers, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionInfo {
    pub id: ExtensionId,
    pub name: String,
    pub platform: PlatformKey,
    pub version: String,
    pub sha256: String,
    pub build_date: Option<DateTime<Utc>>,
    pub compiler: Option<String>,
    pub dependencies: Vec<ExtensionId>,
    pub sqlite_min_version: String,
    pub entry_points: Vec<String>,
}

impl ExtensionInfo {
    /// File name of the binary for this variant, e.g. `fts5.so`.
    pub fn file_name(&self) -> String {
        self.platform.library_file_name(&self.name)
    }
}

/// Options controlling an install run.
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Re-copy binaries even when the installed copy already verifies.
    pub force_reinstall: bool,
}

/// Outcome of one install run.
///
/// Skips are the normal case when platform builds lag behind the catalog,
/// so they are reported here instead of raised.
#[derive(Debug, Clone)]
pub struct InstallReport {
    pub target_dir: PathBuf,
    pub installed: Vec<ExtensionInfo>,
    pub up_to_date: Vec<ExtensionInfo>,
    pub skipped: Vec<InstallIssue>,
}

impl InstallReport {
    pub(crate) fn new(target_dir: PathBuf) -> Self {
        Self {
            target_dir,
            installed: Vec::new(),
            up_to_date: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// True when every applicable extension ended up installed.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    /// Number of extensions the run considered.
    pub fn attempted(&self) -> usize {
        self.installed.len() + self.up_to_date.len() + self.skipped.len()
    }
}

/// Why an extension was skipped during an install run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallIssue {
    pub extension: ExtensionId,
    pub kind: InstallIssueKind,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallIssueKind {
    /// Expected source binary absent from the bundle directory.
    MissingBundle,
    /// Source binary present but its digest does not match the manifest.
    IntegrityMismatch,
    /// Copy into the install directory failed.
    CopyFailed,
}
