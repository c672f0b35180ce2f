//! Show command - displays information.

use anyhow::{bail, Result};

use wpbundle::config::Config;
use wpbundle::plugin::{self, PluginHeader};

/// Show target for the show command.
pub enum ShowTarget {
    /// Effective configuration
    Config,
    /// Parsed header of the source bootstrap file
    Plugin,
}

/// Execute the show command.
pub fn cmd_show(config: &Config, target: ShowTarget) -> Result<()> {
    match target {
        ShowTarget::Config => config.print(),
        ShowTarget::Plugin => {
            let path = config.source_main_file();
            if !path.exists() {
                bail!("Plugin bootstrap file not found at {}", path.display());
            }
            let content = std::fs::read_to_string(&path)?;
            PluginHeader::parse(&content, &config.version_constant)?.print();

            let missing = plugin::missing_hooks(&content);
            if missing.is_empty() {
                println!("  Lifecycle hooks: all registered");
            } else {
                println!("  Lifecycle hooks: missing {}", missing.join(", "));
            }
        }
    }
    Ok(())
}
