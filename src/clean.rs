//! Removal of generated artifacts.

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::Config;

/// Remove a leftover staging tree.
pub fn clean_staging(config: &Config) -> Result<bool> {
    remove_dir(&config.staging_dir(), "staging directory")
}

/// Remove the copied build output from the plugin source tree.
pub fn clean_assets(config: &Config) -> Result<bool> {
    remove_dir(&config.plugin_assets_dir, "plugin assets")
}

/// Remove every `{slug}-v*.zip` (and checksum) in the output directory.
pub fn clean_archives(config: &Config) -> Result<usize> {
    if !config.output_dir.is_dir() {
        println!("No archives to clean.");
        return Ok(0);
    }

    let prefix = format!("{}-v", config.product_slug);
    let mut removed = 0;
    for entry in fs::read_dir(&config.output_dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with(&prefix) && (name.ends_with(".zip") || name.ends_with(".zip.sha256")) {
            println!("Removing {}...", name);
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    if removed == 0 {
        println!("No archives to clean.");
    }
    Ok(removed)
}

/// Staging, assets and archives.
pub fn clean_all(config: &Config) -> Result<()> {
    clean_staging(config)?;
    clean_assets(config)?;
    clean_archives(config)?;
    println!("\nFull clean complete.");
    Ok(())
}

fn remove_dir(dir: &Path, what: &str) -> Result<bool> {
    if dir.exists() {
        println!("Removing {} ({})...", what, dir.display());
        fs::remove_dir_all(dir)?;
        Ok(true)
    } else {
        println!("No {} to clean.", what);
        Ok(false)
    }
}
