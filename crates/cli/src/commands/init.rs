use eyre::Result;
use sqlext_bundle::ManifestStore;

/// Handle the init command - report the manifest created (or found) on load
pub fn handle_init_command(store: &ManifestStore) -> Result<()> {
    println!(
        "✅ Manifest ready at {} ({} extensions in catalog)",
        store.path().display(),
        store.manifest().extensions.len()
    );
    println!("💡 Stage bundles under the sibling 'bundles/<platform>/' directory, then run: sqlext install");
    Ok(())
}
