//! Build command - packages the plugin archive.

use anyhow::Result;

use wpbundle::config::Config;
use wpbundle::package::{self, PackageOptions};

/// Execute the build command.
pub fn cmd_build(config: &Config, skip_build: bool) -> Result<()> {
    package::package(config, &PackageOptions { skip_build })?;
    Ok(())
}
