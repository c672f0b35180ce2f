//! wpbundle - WordPress plugin packager.
//!
//! Builds the web app, stages it into the plugin tree, stamps the plugin
//! bootstrap file with a `base-YYYYMMDD.revision` version and zips the
//! result into `dist/{slug}-v{version}.zip`.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use wpbundle::config::Config;

#[derive(Parser)]
#[command(name = "wpbundle")]
#[command(about = "WordPress plugin packager")]
#[command(
    after_help = "QUICK START:\n  wpbundle preflight  Check tools and project layout\n  wpbundle build      Build and package the plugin\n  wpbundle version    Print the version a build would use\n  wpbundle clean      Remove leftover staging files"
)]
struct Cli {
    /// Project root (default: PROJECT_ROOT or the current directory)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the web app and package the plugin archive
    Build {
        /// Reuse the existing build output instead of running the build command
        #[arg(long)]
        skip_build: bool,

        /// Fail if a version marker is missing from the plugin file
        #[arg(long)]
        strict: bool,

        /// Use this full version instead of computing one (same as PLUGIN_VERSION)
        #[arg(long = "version", value_name = "VERSION")]
        version_override: Option<String>,
    },

    /// Print the version identifier a build would use
    Version,

    /// Run preflight checks
    Preflight {
        /// Fail if any checks fail (exit code 1)
        #[arg(long)]
        strict: bool,
    },

    /// Remove generated artifacts (default: staging directory)
    Clean {
        #[command(subcommand)]
        what: Option<CleanTarget>,
    },

    /// Show information
    Show {
        #[command(subcommand)]
        what: ShowTarget,
    },
}

#[derive(Subcommand)]
enum CleanTarget {
    /// Leftover staging directory
    Staging,
    /// Copied build output in the plugin tree
    Assets,
    /// Plugin archives and checksums
    Archives,
    /// Everything above
    All,
}

#[derive(Subcommand)]
enum ShowTarget {
    /// Show current configuration
    Config,
    /// Show the plugin header and lifecycle hooks
    Plugin,
}

/// `.env` lives under the root, so PROJECT_ROOT is only read from the process environment.
fn project_root(cli_root: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = cli_root {
        return Ok(root);
    }
    if let Some(root) = std::env::var_os("PROJECT_ROOT").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    std::env::current_dir().context("Failed to determine current directory")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = project_root(cli.root)?;
    let mut config = Config::load(&root);

    match cli.command {
        Commands::Build {
            skip_build,
            strict,
            version_override,
        } => {
            if strict {
                config.strict_version_patch = true;
            }
            if let Some(v) = version_override.filter(|v| !v.is_empty()) {
                config.version_override = Some(v);
            }
            commands::cmd_build(&config, skip_build)?;
        }

        Commands::Version => {
            commands::cmd_version(&config)?;
        }

        Commands::Preflight { strict } => {
            commands::cmd_preflight(&config, strict)?;
        }

        Commands::Clean { what } => {
            let clean_target = match what {
                None | Some(CleanTarget::Staging) => commands::clean::CleanTarget::Staging,
                Some(CleanTarget::Assets) => commands::clean::CleanTarget::Assets,
                Some(CleanTarget::Archives) => commands::clean::CleanTarget::Archives,
                Some(CleanTarget::All) => commands::clean::CleanTarget::All,
            };
            commands::cmd_clean(&config, clean_target)?;
        }

        Commands::Show { what } => {
            let show_target = match what {
                ShowTarget::Config => commands::show::ShowTarget::Config,
                ShowTarget::Plugin => commands::show::ShowTarget::Plugin,
            };
            commands::cmd_show(&config, show_target)?;
        }
    }

    Ok(())
}
