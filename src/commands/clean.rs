//! Clean command - removes generated artifacts.

use anyhow::Result;

use wpbundle::clean;
use wpbundle::config::Config;

/// Clean target for the clean command.
pub enum CleanTarget {
    /// Leftover staging tree (default)
    Staging,
    /// Copied build output in the plugin tree
    Assets,
    /// Archives and checksums in the output directory
    Archives,
    /// Everything above
    All,
}

/// Execute the clean command.
pub fn cmd_clean(config: &Config, target: CleanTarget) -> Result<()> {
    match target {
        CleanTarget::Staging => {
            clean::clean_staging(config)?;
        }
        CleanTarget::Assets => {
            clean::clean_assets(config)?;
        }
        CleanTarget::Archives => {
            clean::clean_archives(config)?;
        }
        CleanTarget::All => clean::clean_all(config)?,
    }
    Ok(())
}
