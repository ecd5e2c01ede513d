use eyre::Result;
use sqlext_bundle::{BundleInstaller, ManifestStore};

/// Handle the list command - show extensions installable on this platform
pub fn handle_list_command(
    store: &ManifestStore,
    installer: &BundleInstaller,
    json: bool,
) -> Result<()> {
    let available = installer.list_available(store.manifest());

    if json {
        println!("{}", serde_json::to_string_pretty(&available)?);
        return Ok(());
    }

    if available.is_empty() {
        println!(
            "No extensions bundled for {} yet. The catalog knows {} extensions.",
            installer.platform(),
            store.manifest().extensions.len()
        );
        return Ok(());
    }

    println!("📦 Extensions available for {}:", installer.platform());
    for info in available {
        print!("  {} {}@{}", info.file_name(), info.id, info.version);
        if let Some(compiler) = &info.compiler {
            print!(" (built with {})", compiler);
        }
        println!();
        println!("    sqlite >= {}", info.sqlite_min_version);
    }

    Ok(())
}
