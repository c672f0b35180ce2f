//! The packaging pipeline.
//!
//! version -> build -> assets -> staging -> stamp -> zip -> summary -> cleanup
//!
//! Each step's output is the next step's input, so the first failure aborts
//! the run. The staging tree is left in place on failure; the next run
//! recreates it and `wpbundle clean` removes it.

use anyhow::{bail, Result};
use std::path::Path;
use std::time::Instant;

use crate::archive::{self, Archive};
use crate::config::Config;
use crate::patch::{self, PatchReport};
use crate::process::Cmd;
use crate::stage;
use crate::timing::Timer;
use crate::version::{self, BuildVersion};

/// Options for a packaging run.
#[derive(Debug, Clone, Default)]
pub struct PackageOptions {
    /// Reuse the existing build output instead of running the build command
    pub skip_build: bool,
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct PackageOutcome {
    pub version: BuildVersion,
    pub archive: Archive,
    pub patch: PatchReport,
    pub assets_copied: usize,
}

/// Run the configured build command with the user's terminal attached.
pub fn run_build(config: &Config) -> Result<()> {
    Cmd::shell(&config.build_command)
        .dir(&config.root)
        .error_msg(format!("Build failed: `{}`", config.build_command))
        .run_interactive()?;
    Ok(())
}

/// Rewrite the version markers in the staged bootstrap file.
///
/// Missing markers warn, or fail when `strict_version_patch` is set. A marker
/// that was rewritten but does not read back as `version` always fails.
pub fn stamp_version(config: &Config, staged_file: &Path, version: &str) -> Result<PatchReport> {
    let report = patch::patch_file(staged_file, version, &config.version_constant)?;

    if !report.complete() {
        let missing = report.missing(&config.version_constant).join(", ");
        if config.strict_version_patch {
            bail!(
                "Version marker(s) not found in {}: {}",
                staged_file.display(),
                missing
            );
        }
        eprintln!(
            "  [WARN] Version marker(s) not found in {}: {}. The archive name and plugin metadata will disagree.",
            staged_file.display(),
            missing
        );
    }

    patch::verify_file(staged_file, version, &config.version_constant, &report)?;
    Ok(report)
}

/// Full run: compute the version, then package.
pub fn package(config: &Config, opts: &PackageOptions) -> Result<PackageOutcome> {
    let version = version::current_version(&config.root, config.version_override.as_deref())?;
    package_version(config, version, opts)
}

/// Package with an already computed version.
pub fn package_version(
    config: &Config,
    version: BuildVersion,
    opts: &PackageOptions,
) -> Result<PackageOutcome> {
    let version_str = version.to_string();
    println!("=== Building {} v{} ===\n", config.product_slug, version_str);
    let run_start = Instant::now();

    // 1. Build
    if opts.skip_build {
        println!("[SKIP] Build (--skip-build), reusing {}", config.build_output_dir.display());
    } else {
        println!("Step 1: Building with profile '{}'...", config.build_profile);
        let t = Timer::start("Build");
        run_build(config)?;
        t.finish();
    }

    // 2. Assets
    println!("\nStep 2: Copying build output to {}...", config.plugin_assets_dir.display());
    let assets_copied = stage::refresh_assets(config)?;
    println!("  {} file(s) copied", assets_copied);

    // 3. Staging
    println!("\nStep 3: Creating staging directory...");
    let staging = stage::stage_plugin(config)?;

    // 4. Version stamp
    println!("\nStep 4: Updating version in staged plugin file...");
    let patch = stamp_version(config, &config.staged_main_file(), &version_str)?;
    println!("  Version updated to {}", version_str);

    // 5. Archive
    println!("\nStep 5: Creating plugin archive...");
    let t = Timer::start("Archive");
    let archive = archive::compress_dir(&staging, &config.archive_path(&version_str))?;
    t.finish();

    let outcome = PackageOutcome {
        version,
        archive,
        patch,
        assets_copied,
    };
    finalize(config, &outcome);

    let secs = run_start.elapsed().as_secs_f64();
    println!("Total time: {:.1}s", secs);
    Ok(outcome)
}

/// Remove the staging tree and print the summary.
pub fn finalize(config: &Config, outcome: &PackageOutcome) {
    stage::cleanup_work_dir(&config.staging_dir());

    let shown = outcome
        .archive
        .path
        .strip_prefix(&config.root)
        .unwrap_or(&outcome.archive.path);

    println!("\n=== WordPress Plugin Build Complete ===\n");
    println!("Summary:");
    println!("  Version: {}", outcome.version);
    println!("  Output: {}", shown.display());
    println!("  Size: {:.2} MB", outcome.archive.size_mib());
    println!("  SHA-256: {}", outcome.archive.sha256);
    println!();
    println!("Next steps:");
    println!("  1. Test the plugin in a WordPress installation");
    println!("  2. Upload to WordPress: Plugins -> Add New -> Upload Plugin");
    println!("  3. Activate and configure the plugin settings page");
    println!("  4. Add the plugin's shortcode to a page");
    println!();
}
