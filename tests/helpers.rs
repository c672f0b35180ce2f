//! Shared test utilities for wpbundle tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wpbundle::config::Config;

/// Bootstrap file shaped like a real plugin's main PHP file.
pub const BOOTSTRAP_PHP: &str = r#"<?php
/**
 * Plugin Name: OIAA Direct Meetings
 * Description: Embeds the meetings application via shortcode
 * Version: 0.0.0-dev
 * Text Domain: oiaa-meetings
 */

if (!defined('ABSPATH')) {
    exit;
}

define('OIAA_MEETINGS_VERSION', '0.0.0-dev');

add_action('plugins_loaded', 'oiaa_meetings_init');
register_activation_hook(__FILE__, 'oiaa_meetings_activate');
register_deactivation_hook(__FILE__, 'oiaa_meetings_deactivate');
register_uninstall_hook(__FILE__, 'oiaa_meetings_uninstall');
"#;

/// Build command that fakes a bundler run.
pub const FAKE_BUILD: &str =
    "mkdir -p dist-wordpress/js && printf 'console.log(1)' > dist-wordpress/js/app.js";

/// A mock project in a temporary directory.
pub struct TestProject {
    /// Kept alive for the lifetime of the project
    pub _temp_dir: TempDir,
    pub root: PathBuf,
}

impl TestProject {
    /// package.json at version `base` plus a plugin source tree.
    pub fn new(base: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let root = temp_dir.path().to_path_buf();

        fs::write(
            root.join("package.json"),
            format!(r#"{{"name": "oiaa-direct", "version": "{}"}}"#, base),
        )
        .expect("Failed to write package.json");

        let plugin = root.join("wordpress-plugin");
        fs::create_dir_all(plugin.join("includes")).expect("Failed to create plugin dir");
        fs::write(plugin.join("oiaa-meetings-plugin.php"), BOOTSTRAP_PHP)
            .expect("Failed to write bootstrap file");
        fs::write(plugin.join("includes/shortcode.php"), "<?php // shortcode\n")
            .expect("Failed to write include");
        fs::write(plugin.join(".DS_Store"), "junk").expect("Failed to write .DS_Store");

        Self {
            _temp_dir: temp_dir,
            root,
        }
    }

    /// Config with the given overrides on top of the defaults.
    pub fn config(&self, vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_vars(&self.root, &vars)
    }

    /// Config that uses the fake build command.
    pub fn fake_build_config(&self) -> Config {
        self.config(&[("BUILD_COMMAND", FAKE_BUILD)])
    }

    pub fn write_bootstrap(&self, content: &str) {
        fs::write(
            self.root.join("wordpress-plugin/oiaa-meetings-plugin.php"),
            content,
        )
        .expect("Failed to write bootstrap file");
    }

    /// Every `*.zip` in dist/.
    pub fn archives(&self) -> Vec<String> {
        let dist = self.root.join("dist");
        if !dist.is_dir() {
            return Vec::new();
        }
        let mut names: Vec<String> = fs::read_dir(dist)
            .expect("Failed to read dist")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".zip"))
            .collect();
        names.sort();
        names
    }
}

/// True if the archive tools the tests shell out to are installed.
pub fn have_zip_tools() -> bool {
    let ok = wpbundle::process::exists("zip") && wpbundle::process::exists("unzip");
    if !ok {
        eprintln!("Skipping: zip/unzip not installed");
    }
    ok
}

/// Read one entry out of a zip archive.
pub fn read_zip_entry(archive: &Path, entry: &str) -> String {
    wpbundle::process::Cmd::new("unzip")
        .arg("-p")
        .arg_path(archive)
        .arg(entry)
        .run()
        .expect("unzip -p failed")
        .stdout
}

/// List the entries of a zip archive.
pub fn list_zip(archive: &Path) -> String {
    wpbundle::process::Cmd::new("unzip")
        .arg("-l")
        .arg_path(archive)
        .run()
        .expect("unzip -l failed")
        .stdout
}

/// Assert that a file contains expected content.
pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));
    assert!(
        content.contains(expected),
        "File {} does not contain expected content.\nExpected to find: {}\nActual content: {}",
        path.display(),
        expected,
        content
    );
}
