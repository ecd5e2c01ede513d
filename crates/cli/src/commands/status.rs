use eyre::Result;
use sqlext_bundle::{BundleInstaller, ManifestStore};

/// Handle the status command - show the catalog and what is installed
pub fn handle_status_command(store: &ManifestStore, installer: &BundleInstaller) -> Result<()> {
    let manifest = store.manifest();
    let platform = installer.platform();

    println!("📊 Bundle status:");
    println!("  Manifest: {}", store.path().display());
    println!("  Format version: {}", manifest.format_version);
    println!("  Platform: {}", platform);

    let install_dir = installer.install_dir();
    for (&id, record) in &manifest.extensions {
        print!("  📍 {}: ", id);
        match manifest.info(id, platform) {
            Some(info) => {
                let target = install_dir.join(info.file_name());
                if installer.verify(manifest, id, &target) {
                    println!("✅ installed ({}@{})", info.name, info.version);
                } else {
                    println!("⬇️  available, not installed ({}@{})", info.name, info.version);
                }
            }
            None => {
                let platforms_built = record
                    .platforms
                    .values()
                    .filter(|variant| variant.is_available())
                    .count();
                println!(
                    "➖ not built for this platform ({}/{} platforms built)",
                    platforms_built,
                    record.platforms.len()
                );
            }
        }
    }

    Ok(())
}
