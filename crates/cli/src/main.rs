mod cli;
mod commands;

use clap::Parser;
use sqlext_bundle::{BundleInstaller, BundleLayout, ManifestStore, PlatformKey};

use crate::cli::Commands;

fn main() -> eyre::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let layout = match cli.base_dir {
        Some(dir) => BundleLayout::new(dir),
        None => BundleLayout::with_default_base_dir()?,
    };
    let platform = match cli.platform {
        Some(platform) => platform,
        None => PlatformKey::detect()?,
    };

    tracing::debug!(
        "Using manifest at {} for platform {}",
        layout.manifest_path().display(),
        platform
    );

    let store = ManifestStore::load(layout.manifest_path())?;
    let installer = BundleInstaller::new(platform, layout);

    match cli.command {
        Commands::List { json } => {
            commands::handle_list_command(&store, &installer, json)?;
        }
        Commands::Install { force } => {
            commands::handle_install_command(&store, &installer, force)?;
        }
        Commands::Verify { extension, file } => {
            commands::handle_verify_command(&store, &installer, extension, file)?;
        }
        Commands::Status => {
            commands::handle_status_command(&store, &installer)?;
        }
        Commands::Init => {
            commands::handle_init_command(&store)?;
        }
    }

    Ok(())
}
