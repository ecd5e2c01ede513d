use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ExtensionId;
use crate::models::ExtensionInfo;
use crate::platform::PlatformKey;

/// Manifest format revision this crate reads and writes.
pub const MANIFEST_FORMAT_VERSION: &str = "1.0";

/// Persisted catalog of known extensions and their expected per-platform
/// integrity hashes. The sole source of truth for what can be installed.
///
/// Both maps are `BTreeMap` so iteration and serialization order are
/// deterministic and a save/load round trip is byte-stable.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Manifest {
    pub format_version: String,
    pub extensions: BTreeMap<ExtensionId, ExtensionRecord>,
}

impl Manifest {
    /// Catalog used when no manifest exists on disk yet: every known
    /// extension with every platform variant present and no hash recorded,
    /// meaning nothing has been bundled.
    pub fn default_catalog() -> Self {
        let extensions = ExtensionId::ALL
            .into_iter()
            .map(|id| (id, ExtensionRecord::stub(id)))
            .collect();

        Self {
            format_version: MANIFEST_FORMAT_VERSION.to_string(),
            extensions,
        }
    }

    pub fn record(&self, id: ExtensionId) -> Option<&ExtensionRecord> {
        self.extensions.get(&id)
    }

    /// Resolved view of one extension on one platform, if that variant has
    /// actually been built.
    pub fn info(&self, id: ExtensionId, platform: PlatformKey) -> Option<ExtensionInfo> {
        self.record(id).and_then(|record| record.info(id, platform))
    }
}

/// Per-extension manifest entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExtensionRecord {
    /// File stem of the shared library, `<name><platform suffix>` on disk.
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<ExtensionId>,
    pub sqlite_min_version: String,
    pub entry_points: Vec<String>,
    pub platforms: BTreeMap<PlatformKey, VariantRecord>,
}

impl ExtensionRecord {
    fn stub(id: ExtensionId) -> Self {
        let platforms = PlatformKey::ALL
            .into_iter()
            .map(|platform| (platform, VariantRecord::unbuilt()))
            .collect();

        Self {
            name: id.default_file_stem().to_string(),
            dependencies: Vec::new(),
            sqlite_min_version: id.default_min_engine_version().to_string(),
            entry_points: vec![id.default_entry_point()],
            platforms,
        }
    }

    pub fn variant(&self, platform: PlatformKey) -> Option<&VariantRecord> {
        self.platforms.get(&platform)
    }

    /// Whether an engine at `engine` is new enough to load this extension.
    /// An unparseable version pin counts as incompatible.
    pub fn supports_engine(&self, engine: &semver::Version) -> bool {
        semver::Version::parse(&self.sqlite_min_version)
            .map(|min| *engine >= min)
            .unwrap_or(false)
    }

    pub fn info(&self, id: ExtensionId, platform: PlatformKey) -> Option<ExtensionInfo> {
        let variant = self.variant(platform)?;
        let sha256 = variant.sha256.clone()?;

        Some(ExtensionInfo {
            id,
            name: self.name.clone(),
            platform,
            version: variant.version.clone(),
            sha256,
            build_date: variant.build_date,
            compiler: variant.compiler.clone(),
            dependencies: self.dependencies.clone(),
            sqlite_min_version: self.sqlite_min_version.clone(),
            entry_points: self.entry_points.clone(),
        })
    }
}

/// Per-(extension, platform) build artifact metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VariantRecord {
    pub version: String,

    /// Hex digest of the built binary. `null` until the build pipeline has
    /// produced and recorded a build for this platform.
    pub sha256: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler: Option<String>,
}

impl VariantRecord {
    pub fn unbuilt() -> Self {
        Self {
            version: "0.0.0".to_string(),
            sha256: None,
            build_date: None,
            compiler: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.sha256.is_some()
    }
}

/// Content hashing for bundle binaries.
///
/// The manifest stores bare SHA-256 hex digests, so this is fixed to one
/// algorithm rather than tagged `algorithm:value` pairs.
pub mod checksum {
    use std::fs::File;
    use std::io;
    use std::path::Path;

    use sha2::{Digest, Sha256};

    /// Hex digest of an in-memory buffer.
    pub fn sha256_hex(data: &[u8]) -> String {
        format!("{:x}", Sha256::digest(data))
    }

    /// Hex digest of a file, streamed so large binaries do not need to fit
    /// in memory. Every byte of the file contributes to the digest.
    pub fn sha256_file(path: &Path) -> io::Result<String> {
        let mut file = File::open(path)?;
        let mut hasher = Sha256::new();
        io::copy(&mut file, &mut hasher)?;
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Stored digests may differ from computed ones in hex case only.
    pub fn digests_match(expected: &str, actual: &str) -> bool {
        expected.eq_ignore_ascii_case(actual)
    }
}
