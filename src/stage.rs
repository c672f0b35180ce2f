//! Staging: assembling the plugin tree that gets archived.
//!
//! Both copies are full, byte-for-byte duplicates. Symlinks are followed so
//! the staged tree never points back into the source tree.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::Config;

/// Remove `dir` if present and create it empty.
pub fn prepare_work_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to clear {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(())
}

/// Remove a work directory. Missing directories are fine.
pub fn cleanup_work_dir(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}

/// Recursively copy the contents of `src` into `dst`.
///
/// Returns the number of files copied.
pub fn copy_dir_recursive(src: &Path, dst: &Path) -> Result<usize> {
    if !src.is_dir() {
        bail!("Source directory not found: {}", src.display());
    }
    fs::create_dir_all(dst)?;

    let mut copied = 0;
    for entry in WalkDir::new(src).follow_links(true).min_depth(1) {
        let entry = entry.with_context(|| format!("Failed to walk {}", src.display()))?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .context("Walked entry outside source directory")?;
        let dest_path = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .with_context(|| format!("Failed to create {}", dest_path.display()))?;
        } else {
            fs::copy(entry.path(), &dest_path).with_context(|| {
                format!(
                    "Failed to copy {} -> {}",
                    entry.path().display(),
                    dest_path.display()
                )
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Copy the build output into the plugin's assets directory.
///
/// The assets directory is cleared first so stale bundles never ship.
pub fn refresh_assets(config: &Config) -> Result<usize> {
    if !config.build_output_dir.is_dir() {
        bail!(
            "Build output not found at {}.\n\
             The build step did not produce any output.",
            config.build_output_dir.display()
        );
    }

    prepare_work_dir(&config.plugin_assets_dir)?;
    copy_dir_recursive(&config.build_output_dir, &config.plugin_assets_dir)
}

/// Copy the plugin source tree into a fresh staging directory.
pub fn stage_plugin(config: &Config) -> Result<PathBuf> {
    if !config.plugin_source_dir.is_dir() {
        bail!(
            "Plugin source directory not found at {}",
            config.plugin_source_dir.display()
        );
    }

    let staging = config.staging_dir();
    prepare_work_dir(&staging)?;
    copy_dir_recursive(&config.plugin_source_dir, &staging)?;
    Ok(staging)
}
