use std::path::PathBuf;

use eyre::Result;
use sqlext_bundle::{BundleInstaller, ExtensionId, ManifestStore};

/// Handle the verify command - check a binary against its manifest digest
pub fn handle_verify_command(
    store: &ManifestStore,
    installer: &BundleInstaller,
    extension: ExtensionId,
    file: Option<PathBuf>,
) -> Result<()> {
    let file = file.unwrap_or_else(|| {
        let stem = store
            .manifest()
            .record(extension)
            .map(|record| record.name.clone())
            .unwrap_or_else(|| extension.to_string());
        installer
            .bundle_dir()
            .join(installer.platform().library_file_name(&stem))
    });

    if installer.verify(store.manifest(), extension, &file) {
        println!("✅ {} verified: {}", extension, file.display());
    } else {
        println!("❌ {} failed verification: {}", extension, file.display());
        match store.manifest().info(extension, installer.platform()) {
            Some(info) => println!("    Expected sha256 {}", info.sha256),
            None => println!(
                "    No built variant recorded for {} on {}",
                extension,
                installer.platform()
            ),
        }
    }

    Ok(())
}
