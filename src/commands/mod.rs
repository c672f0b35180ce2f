//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `build` - Package the plugin archive
//! - `version` - Print the computed version
//! - `preflight` - Run preflight checks
//! - `clean` - Remove generated artifacts
//! - `show` - Display configuration and plugin metadata

pub mod build;
pub mod clean;
mod preflight;
pub mod show;
mod version;

pub use build::cmd_build;
pub use clean::cmd_clean;
pub use preflight::cmd_preflight;
pub use show::cmd_show;
pub use version::cmd_version;
