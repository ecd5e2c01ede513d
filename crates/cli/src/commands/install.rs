use eyre::Result;
use sqlext_bundle::{BundleInstaller, InstallOptions, ManifestStore};

/// Handle the install command - verify and copy bundles into the install dir
pub fn handle_install_command(
    store: &ManifestStore,
    installer: &BundleInstaller,
    force: bool,
) -> Result<()> {
    let options = InstallOptions {
        force_reinstall: force,
    };
    let report = installer.install_with(store.manifest(), &options)?;

    if report.attempted() == 0 {
        println!(
            "Nothing to install: no extensions bundled for {}.",
            installer.platform()
        );
        return Ok(());
    }

    for info in &report.installed {
        println!("✅ Installed {}@{}", info.id, info.version);
    }
    for info in &report.up_to_date {
        println!("✔️  {} already up to date", info.id);
    }
    for issue in &report.skipped {
        println!("⚠️  Skipped {}: {}", issue.extension, issue.detail);
    }

    println!(
        "📂 Install directory: {} ({} installed, {} up to date, {} skipped)",
        report.target_dir.display(),
        report.installed.len(),
        report.up_to_date.len(),
        report.skipped.len()
    );

    Ok(())
}
