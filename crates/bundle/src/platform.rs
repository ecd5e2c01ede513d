use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BundleError, Result};

/// Operating system / architecture pair an extension binary is built for.
///
/// The key doubles as the directory name for staged bundles and installed
/// extensions, so the wire names below are also path segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformKey {
    WinX64,
    LinuxX86,
    LinuxArm64,
    MacosX86,
    MacosArm64,
}

impl PlatformKey {
    pub const ALL: [PlatformKey; 5] = [
        PlatformKey::WinX64,
        PlatformKey::LinuxX86,
        PlatformKey::LinuxArm64,
        PlatformKey::MacosX86,
        PlatformKey::MacosArm64,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformKey::WinX64 => "win-x64",
            PlatformKey::LinuxX86 => "linux-x86",
            PlatformKey::LinuxArm64 => "linux-arm64",
            PlatformKey::MacosX86 => "macos-x86",
            PlatformKey::MacosArm64 => "macos-arm64",
        }
    }

    /// Shared library suffix the OS linker expects.
    pub fn extension_suffix(&self) -> &'static str {
        match self {
            PlatformKey::WinX64 => ".dll",
            PlatformKey::LinuxX86 | PlatformKey::LinuxArm64 => ".so",
            PlatformKey::MacosX86 | PlatformKey::MacosArm64 => ".dylib",
        }
    }

    /// File name of a shared library with stem `stem` on this platform,
    /// e.g. `fts5` becomes `fts5.so` on linux keys.
    pub fn library_file_name(&self, stem: &str) -> String {
        format!("{}{}", stem, self.extension_suffix())
    }

    /// Map the host OS and architecture to a catalog key.
    ///
    /// Callers derive this once and inject it; nothing in this crate calls
    /// it implicitly.
    pub fn detect() -> Result<Self> {
        use std::env::consts::{ARCH, OS};

        match (OS, ARCH) {
            ("windows", "x86_64") => Ok(PlatformKey::WinX64),
            ("linux", "x86" | "x86_64") => Ok(PlatformKey::LinuxX86),
            ("linux", "aarch64") => Ok(PlatformKey::LinuxArm64),
            ("macos", "x86_64") => Ok(PlatformKey::MacosX86),
            ("macos", "aarch64") => Ok(PlatformKey::MacosArm64),
            (os, arch) => Err(BundleError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            }),
        }
    }
}

impl Display for PlatformKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlatformKey {
    type Err = BundleError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "win-x64" => Ok(PlatformKey::WinX64),
            "linux-x86" => Ok(PlatformKey::LinuxX86),
            "linux-arm64" => Ok(PlatformKey::LinuxArm64),
            "macos-x86" => Ok(PlatformKey::MacosX86),
            "macos-arm64" => Ok(PlatformKey::MacosArm64),
            _ => Err(BundleError::UnknownPlatform(s.to_string())),
        }
    }
}
