use std::path::PathBuf;

use sqlext_bundle::{ExtensionId, PlatformKey};

#[derive(clap::Parser, Debug)]
#[clap(name = "sqlext", about = "Manage precompiled SQLite extension bundles")]
pub struct Cli {
    /// Base directory holding the manifest, staged bundles, and installed
    /// extensions (defaults to the OS data directory)
    #[clap(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Override the detected host platform (e.g. "linux-x86")
    #[clap(long, global = true)]
    pub platform: Option<PlatformKey>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// List extensions with a built variant for this platform
    List {
        /// Print the resolved records as JSON
        #[clap(long)]
        json: bool,
    },
    /// Verify and install all available extensions
    Install {
        /// Re-copy binaries even when the installed copy already verifies
        #[clap(long)]
        force: bool,
    },
    /// Verify a file against the manifest digest for an extension
    Verify {
        /// Extension id (e.g. "fts5")
        extension: ExtensionId,
        /// File to check; defaults to the staged bundle for this platform
        file: Option<PathBuf>,
    },
    /// Show manifest and installation status
    Status,
    /// Create the manifest with the default catalog if none exists yet
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verify_args() {
        let cli = Cli::parse_from(["sqlext", "--platform", "linux-arm64", "verify", "fts5"]);
        assert_eq!(cli.platform, Some(PlatformKey::LinuxArm64));
        match cli.command {
            Commands::Verify { extension, file } => {
                assert_eq!(extension, ExtensionId::Fts5);
                assert!(file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
