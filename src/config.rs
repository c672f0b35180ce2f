//! Configuration management for wpbundle.
//!
//! Reads configuration from a .env file and environment variables.
//! Environment variables take precedence over the .env file, CLI flags
//! take precedence over both (applied by the caller).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default slug used in the archive file name.
pub const DEFAULT_PRODUCT_SLUG: &str = "oiaa-meetings-wordpress-plugin";

/// Default build profile (selects `vite.config-{profile}.ts`).
pub const DEFAULT_BUILD_PROFILE: &str = "wordpress";

/// Default name of the PHP constant holding the plugin version.
pub const DEFAULT_VERSION_CONSTANT: &str = "OIAA_MEETINGS_VERSION";

/// Staging directory name, created under the output directory.
pub const STAGING_DIR_NAME: &str = "plugin-staging";

/// Packager configuration. Built once at startup and passed by reference.
#[derive(Debug, Clone)]
pub struct Config {
    /// Project root (holds package.json)
    pub root: PathBuf,
    /// Slug used in `{slug}-v{version}.zip`
    pub product_slug: String,
    /// Named build profile
    pub build_profile: String,
    /// Shell command that produces the build output
    pub build_command: String,
    /// Directory the build command writes into
    pub build_output_dir: PathBuf,
    /// Plugin metadata source tree
    pub plugin_source_dir: PathBuf,
    /// Assets directory inside the plugin source tree
    pub plugin_assets_dir: PathBuf,
    /// Bootstrap file, relative to the plugin source tree
    pub plugin_main_file: PathBuf,
    /// PHP constant carrying the version
    pub version_constant: String,
    /// Where archives are written
    pub output_dir: PathBuf,
    /// Full version override (PLUGIN_VERSION)
    pub version_override: Option<String>,
    /// Fail when a version marker is not found
    pub strict_version_patch: bool,
}

impl Config {
    /// Load configuration from `<root>/.env` and the process environment.
    pub fn load(root: &Path) -> Self {
        let mut vars = HashMap::new();

        // .env values never override variables already set in the environment
        if let Ok(iter) = dotenvy::from_path_iter(root.join(".env")) {
            for (key, value) in iter.flatten() {
                vars.insert(key, value);
            }
        }

        for (key, value) in std::env::vars() {
            vars.insert(key, value);
        }

        Self::from_vars(root, &vars)
    }

    /// Build configuration from an explicit variable map.
    pub fn from_vars(root: &Path, vars: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let path = |key: &str, default: &str| {
            let p = PathBuf::from(get(key).unwrap_or_else(|| default.to_string()));
            if p.is_absolute() {
                p
            } else {
                root.join(p)
            }
        };

        let build_profile = get("BUILD_PROFILE").unwrap_or_else(|| DEFAULT_BUILD_PROFILE.to_string());
        let build_command = get("BUILD_COMMAND").unwrap_or_else(|| {
            format!("npx vite build --config vite.config-{}.ts", build_profile)
        });

        let strict_version_patch = get("STRICT_VERSION_PATCH")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        Self {
            root: root.to_path_buf(),
            product_slug: get("PRODUCT_SLUG").unwrap_or_else(|| DEFAULT_PRODUCT_SLUG.to_string()),
            build_profile,
            build_command,
            build_output_dir: path("BUILD_OUTPUT_DIR", "dist-wordpress"),
            plugin_source_dir: path("PLUGIN_SOURCE_DIR", "wordpress-plugin"),
            plugin_assets_dir: path("PLUGIN_ASSETS_DIR", "wordpress-plugin/assets"),
            plugin_main_file: PathBuf::from(
                get("PLUGIN_MAIN_FILE").unwrap_or_else(|| "oiaa-meetings-plugin.php".to_string()),
            ),
            version_constant: get("PLUGIN_VERSION_CONSTANT")
                .unwrap_or_else(|| DEFAULT_VERSION_CONSTANT.to_string()),
            output_dir: path("OUTPUT_DIR", "dist"),
            // Used verbatim; only an empty value counts as unset
            version_override: vars.get("PLUGIN_VERSION").filter(|v| !v.is_empty()).cloned(),
            strict_version_patch,
        }
    }

    /// Defaults only, rooted at `root`.
    pub fn with_defaults(root: &Path) -> Self {
        Self::from_vars(root, &HashMap::new())
    }

    /// Path to package.json.
    pub fn manifest_path(&self) -> PathBuf {
        self.root.join("package.json")
    }

    /// Temporary staging tree.
    pub fn staging_dir(&self) -> PathBuf {
        self.output_dir.join(STAGING_DIR_NAME)
    }

    /// Bootstrap file inside the source tree.
    pub fn source_main_file(&self) -> PathBuf {
        self.plugin_source_dir.join(&self.plugin_main_file)
    }

    /// Bootstrap file inside the staging tree.
    pub fn staged_main_file(&self) -> PathBuf {
        self.staging_dir().join(&self.plugin_main_file)
    }

    /// Archive file name for a version.
    pub fn archive_name(&self, version: &str) -> String {
        format!("{}-v{}.zip", self.product_slug, version)
    }

    /// Full archive path for a version.
    pub fn archive_path(&self, version: &str) -> PathBuf {
        self.output_dir.join(self.archive_name(version))
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  PROJECT_ROOT: {}", self.root.display());
        println!("  PRODUCT_SLUG: {}", self.product_slug);
        println!("  BUILD_PROFILE: {}", self.build_profile);
        println!("  BUILD_COMMAND: {}", self.build_command);
        println!("  BUILD_OUTPUT_DIR: {}", self.build_output_dir.display());
        println!("  PLUGIN_SOURCE_DIR: {}", self.plugin_source_dir.display());
        println!("  PLUGIN_ASSETS_DIR: {}", self.plugin_assets_dir.display());
        println!("  PLUGIN_MAIN_FILE: {}", self.plugin_main_file.display());
        println!("  PLUGIN_VERSION_CONSTANT: {}", self.version_constant);
        println!("  OUTPUT_DIR: {}", self.output_dir.display());
        match &self.version_override {
            Some(v) => println!("  PLUGIN_VERSION: {}", v),
            None => println!("  PLUGIN_VERSION: (unset, computed per build)"),
        }
        println!("  STRICT_VERSION_PATCH: {}", self.strict_version_patch);
        if self.source_main_file().exists() {
            println!("  Plugin bootstrap file: FOUND");
        } else {
            println!("  Plugin bootstrap file: NOT FOUND");
        }
    }
}
