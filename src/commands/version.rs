//! Version command - prints the version a build would be stamped with.

use anyhow::Result;

use wpbundle::config::Config;
use wpbundle::version;

/// Execute the version command.
pub fn cmd_version(config: &Config) -> Result<()> {
    let v = version::current_version(&config.root, config.version_override.as_deref())?;
    println!("{}", v);
    Ok(())
}
