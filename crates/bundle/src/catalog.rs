use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BundleError, Result};

/// Closed catalog of extensions this distribution knows how to bundle.
///
/// Adding an extension means adding a variant here; manifest records are
/// never created for ids outside this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionId {
    /// Full-text search.
    Fts5,
    /// JSON functions.
    Json1,
    /// R*Tree spatial index.
    Rtree,
    /// Fuzzy string matching.
    Spellfix1,
    /// Page compression helpers.
    Compress,
}

impl ExtensionId {
    pub const ALL: [ExtensionId; 5] = [
        ExtensionId::Fts5,
        ExtensionId::Json1,
        ExtensionId::Rtree,
        ExtensionId::Spellfix1,
        ExtensionId::Compress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExtensionId::Fts5 => "fts5",
            ExtensionId::Json1 => "json1",
            ExtensionId::Rtree => "rtree",
            ExtensionId::Spellfix1 => "spellfix1",
            ExtensionId::Compress => "compress",
        }
    }

    /// File stem of the shared library for this extension.
    pub fn default_file_stem(&self) -> &'static str {
        self.as_str()
    }

    /// Entry point symbol the engine resolves after loading the binary.
    pub fn default_entry_point(&self) -> String {
        format!("sqlite3_{}_init", self.as_str())
    }

    /// Minimum engine version the stock build of this extension supports.
    pub fn default_min_engine_version(&self) -> &'static str {
        match self {
            ExtensionId::Fts5 | ExtensionId::Json1 => "3.9.0",
            ExtensionId::Rtree | ExtensionId::Spellfix1 | ExtensionId::Compress => "3.8.0",
        }
    }
}

impl Display for ExtensionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ExtensionId {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fts5" => Ok(ExtensionId::Fts5),
            "json1" => Ok(ExtensionId::Json1),
            "rtree" => Ok(ExtensionId::Rtree),
            "spellfix1" => Ok(ExtensionId::Spellfix1),
            "compress" => Ok(ExtensionId::Compress),
            _ => Err(BundleError::UnknownExtension(s.to_string())),
        }
    }
}
