//! End-to-end packaging tests against a mock project.
//!
//! Tests that need `zip`/`unzip` skip themselves when the tools are missing.

mod helpers;

use chrono::NaiveDate;
use helpers::{
    assert_file_contains, have_zip_tools, list_zip, read_zip_entry, TestProject, FAKE_BUILD,
};
use std::fs;
use wpbundle::archive;
use wpbundle::package::{self, PackageOptions};
use wpbundle::plugin::PluginHeader;
use wpbundle::process::{self, Cmd};
use wpbundle::version::{self, BuildVersion};

fn computed(base: &str, revision: &str) -> BuildVersion {
    BuildVersion::Computed {
        base: base.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        revision: revision.to_string(),
    }
}

#[test]
fn test_scenario_archive_name_and_metadata_agree() {
    if !have_zip_tools() {
        return;
    }
    let project = TestProject::new("1.2.3");
    let config = project.fake_build_config();

    let outcome = package::package_version(
        &config,
        computed("1.2.3", "abc1234"),
        &PackageOptions::default(),
    )
    .expect("packaging should succeed");

    assert_eq!(outcome.version.to_string(), "1.2.3-20240601.abc1234");
    assert_eq!(
        outcome.archive.path.file_name().unwrap().to_string_lossy(),
        "oiaa-meetings-wordpress-plugin-v1.2.3-20240601.abc1234.zip"
    );
    assert!(outcome.patch.complete());

    let staged = read_zip_entry(&outcome.archive.path, "oiaa-meetings-plugin.php");
    let header = PluginHeader::parse(&staged, "OIAA_MEETINGS_VERSION").unwrap();
    assert_eq!(header.version(), Some("1.2.3-20240601.abc1234"));
    assert_eq!(
        header.version_constant.as_deref(),
        Some("1.2.3-20240601.abc1234")
    );
}

#[test]
fn test_archive_contents_and_source_untouched() {
    if !have_zip_tools() {
        return;
    }
    let project = TestProject::new("1.0.0");
    let config = project.fake_build_config();

    let outcome = package::package_version(
        &config,
        BuildVersion::Override("1.0.0-rc1".to_string()),
        &PackageOptions::default(),
    )
    .unwrap();

    let listing = list_zip(&outcome.archive.path);
    assert!(listing.contains("oiaa-meetings-plugin.php"));
    assert!(listing.contains("includes/shortcode.php"));
    assert!(listing.contains("assets/js/app.js"));
    assert!(!listing.contains(".DS_Store"));
    // Entries are relative to the staging root
    assert!(!listing.contains("plugin-staging"));

    // Only the staged copy is stamped
    assert_file_contains(
        &project.root.join("wordpress-plugin/oiaa-meetings-plugin.php"),
        "define('OIAA_MEETINGS_VERSION', '0.0.0-dev');",
    );
    // Staging removed, assets kept
    assert!(!config.staging_dir().exists());
    assert!(config.plugin_assets_dir.join("js/app.js").exists());
}

#[test]
fn test_checksum_sidecar_matches_archive() {
    if !have_zip_tools() {
        return;
    }
    let project = TestProject::new("1.0.0");
    let config = project.fake_build_config();

    let outcome = package::package_version(
        &config,
        BuildVersion::Override("1.0.0".to_string()),
        &PackageOptions::default(),
    )
    .unwrap();

    let sidecar = fs::read_to_string(outcome.archive.checksum_path()).unwrap();
    let digest = archive::sha256_file(&outcome.archive.path).unwrap();
    assert_eq!(digest, outcome.archive.sha256);
    assert!(sidecar.starts_with(&digest));
    assert!(sidecar.trim_end().ends_with("oiaa-meetings-wordpress-plugin-v1.0.0.zip"));
}

#[test]
fn test_second_run_overwrites_archive() {
    if !have_zip_tools() {
        return;
    }
    let project = TestProject::new("2.0.0");
    let config = project.fake_build_config();
    let version = computed("2.0.0", "deadbee");

    package::package_version(&config, version.clone(), &PackageOptions::default()).unwrap();
    let first = project.archives();

    package::package_version(&config, version, &PackageOptions::default()).unwrap();
    let second = project.archives();

    assert_eq!(first.len(), 1);
    assert_eq!(first, second);
}

#[test]
fn test_stale_assets_are_cleared() {
    if !have_zip_tools() {
        return;
    }
    let project = TestProject::new("1.0.0");
    let config = project.fake_build_config();
    fs::create_dir_all(&config.plugin_assets_dir).unwrap();
    fs::write(config.plugin_assets_dir.join("old-bundle.js"), "stale").unwrap();

    let outcome = package::package_version(
        &config,
        BuildVersion::Override("1.0.0".to_string()),
        &PackageOptions::default(),
    )
    .unwrap();

    assert!(!config.plugin_assets_dir.join("old-bundle.js").exists());
    assert!(!list_zip(&outcome.archive.path).contains("old-bundle.js"));
}

#[test]
fn test_missing_build_output_aborts_without_archive() {
    let project = TestProject::new("1.0.0");
    // Build "succeeds" but writes nothing
    let config = project.config(&[("BUILD_COMMAND", "true")]);

    let err = package::package_version(
        &config,
        BuildVersion::Override("1.0.0".to_string()),
        &PackageOptions::default(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("Build output not found"));
    assert!(project.archives().is_empty());
}

#[test]
fn test_failing_build_aborts_without_archive() {
    let project = TestProject::new("1.0.0");
    let config = project.config(&[("BUILD_COMMAND", "exit 2")]);

    let err = package::package_version(
        &config,
        BuildVersion::Override("1.0.0".to_string()),
        &PackageOptions::default(),
    )
    .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("Build failed"), "unexpected error: {}", msg);
    assert!(msg.contains("exit code 2"));
    assert!(project.archives().is_empty());
    assert!(!project.root.join("wordpress-plugin/assets").exists());
}

#[test]
fn test_skip_build_reuses_existing_output() {
    if !have_zip_tools() {
        return;
    }
    let project = TestProject::new("1.0.0");
    // A build command that would fail if it ran
    let config = project.config(&[("BUILD_COMMAND", "exit 1")]);
    fs::create_dir_all(&config.build_output_dir).unwrap();
    fs::write(config.build_output_dir.join("main.js"), "x").unwrap();

    let outcome = package::package_version(
        &config,
        BuildVersion::Override("1.0.0".to_string()),
        &PackageOptions { skip_build: true },
    )
    .unwrap();

    assert!(list_zip(&outcome.archive.path).contains("assets/main.js"));
}

#[test]
fn test_missing_markers_warn_by_default() {
    if !have_zip_tools() {
        return;
    }
    let project = TestProject::new("1.0.0");
    project.write_bootstrap("<?php\n/**\n * Plugin Name: Bare\n */\n");
    let config = project.fake_build_config();

    let outcome = package::package_version(
        &config,
        BuildVersion::Override("1.0.0".to_string()),
        &PackageOptions::default(),
    )
    .unwrap();

    assert!(!outcome.patch.header);
    assert!(!outcome.patch.constant);
    assert_eq!(project.archives().len(), 1);
}

#[test]
fn test_missing_markers_fail_in_strict_mode() {
    let project = TestProject::new("1.0.0");
    project.write_bootstrap("<?php\n/**\n * Plugin Name: Bare\n */\n");
    let config = project.config(&[("BUILD_COMMAND", FAKE_BUILD), ("STRICT_VERSION_PATCH", "1")]);

    let err = package::package_version(
        &config,
        BuildVersion::Override("1.0.0".to_string()),
        &PackageOptions::default(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("Version marker(s) not found"));
    assert!(project.archives().is_empty());
}

#[test]
fn test_current_version_honours_override() {
    let project = TestProject::new("1.2.3");
    let v = version::current_version(&project.root, Some("7.7.7-hotfix")).unwrap();
    assert_eq!(v.to_string(), "7.7.7-hotfix");
    assert!(v.is_override());
}

#[test]
fn test_current_version_shape() {
    let project = TestProject::new("1.2.3");
    let v = version::current_version(&project.root, None).unwrap();
    let s = v.to_string();

    let rest = s.strip_prefix("1.2.3-").expect("base prefix");
    let (date, revision) = rest.split_once('.').expect("date.revision");
    assert_eq!(date.len(), 8);
    assert!(date.chars().all(|c| c.is_ascii_digit()));
    assert!(!revision.is_empty());
}

#[test]
fn test_current_version_uses_git_head() {
    if !process::exists("git") {
        eprintln!("[SKIP] git not installed");
        return;
    }
    let project = TestProject::new("2.4.0");
    let git = |args: &[&str]| {
        Cmd::new("git")
            .args(args)
            .dir(&project.root)
            .run()
            .unwrap()
            .stdout_trimmed()
            .to_string()
    };
    git(&["init", "-q"]);
    git(&["config", "user.email", "packager@example.com"]);
    git(&["config", "user.name", "Packager"]);
    git(&["config", "commit.gpgsign", "false"]);
    git(&["add", "package.json"]);
    git(&["commit", "-q", "-m", "initial"]);
    let head = git(&["rev-parse", "--short", "HEAD"]);

    let v = version::current_version(&project.root, None).unwrap();
    assert_eq!(v.revision(), Some(head.as_str()));
    assert!(v.to_string().starts_with("2.4.0-"));
    assert!(v.to_string().ends_with(&format!(".{}", head)));
}

#[test]
fn test_current_version_requires_manifest() {
    let project = TestProject::new("1.0.0");
    fs::remove_file(project.root.join("package.json")).unwrap();
    let err = version::current_version(&project.root, None).unwrap_err();
    assert!(format!("{:#}", err).contains("package.json"));
}
