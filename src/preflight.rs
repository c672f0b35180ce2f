//! Preflight checks for a packaging run.
//!
//! Validates host tools and the project layout before building.
//! Run with `wpbundle preflight` to check everything is ready.

use anyhow::{bail, Result};
use std::fs;

use crate::config::Config;
use crate::patch;
use crate::plugin::{self, PluginHeader};
use crate::process;
use crate::version::PackageManifest;

/// Result of a single preflight check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed.
    Pass,
    /// Check failed - packaging will fail.
    Fail,
    /// Check passed but with a warning.
    Warn,
    /// Check skipped (not applicable).
    Skip,
}

impl CheckResult {
    pub fn pass(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Pass,
            details: None,
        }
    }

    pub fn pass_with(name: &str, details: &str) -> Self {
        Self {
            status: CheckStatus::Pass,
            details: Some(details.to_string()),
            ..Self::pass(name)
        }
    }

    pub fn fail(name: &str, details: &str) -> Self {
        Self {
            status: CheckStatus::Fail,
            details: Some(details.to_string()),
            ..Self::pass(name)
        }
    }

    pub fn warn(name: &str, details: &str) -> Self {
        Self {
            status: CheckStatus::Warn,
            details: Some(details.to_string()),
            ..Self::pass(name)
        }
    }

    pub fn skip(name: &str, details: &str) -> Self {
        Self {
            status: CheckStatus::Skip,
            details: Some(details.to_string()),
            ..Self::pass(name)
        }
    }
}

/// Results of all preflight checks.
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    /// Returns true if no check failed.
    pub fn all_passed(&self) -> bool {
        !self.checks.iter().any(|c| c.status == CheckStatus::Fail)
    }

    fn count(&self, status: CheckStatus) -> usize {
        self.checks.iter().filter(|c| c.status == status).count()
    }

    pub fn fail_count(&self) -> usize {
        self.count(CheckStatus::Fail)
    }

    pub fn warn_count(&self) -> usize {
        self.count(CheckStatus::Warn)
    }

    /// Look up a check by name.
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn print(&self) {
        println!("=== Preflight Check Results ===\n");

        for check in &self.checks {
            let (icon, status_str) = match check.status {
                CheckStatus::Pass => ("✓", "PASS"),
                CheckStatus::Fail => ("✗", "FAIL"),
                CheckStatus::Warn => ("⚠", "WARN"),
                CheckStatus::Skip => ("○", "SKIP"),
            };

            print!("  {} [{}] {}", icon, status_str, check.name);
            match &check.details {
                Some(details) => println!(": {}", details),
                None => println!(),
            }
        }

        println!();
        println!(
            "Total: {} checks, {} passed, {} failed, {} warnings",
            self.checks.len(),
            self.count(CheckStatus::Pass),
            self.fail_count(),
            self.warn_count()
        );
    }
}

/// Run all preflight checks.
pub fn run_preflight(config: &Config) -> PreflightReport {
    let mut checks = Vec::new();

    println!("Running preflight checks...\n");

    println!("Checking host tools...");
    checks.extend(check_host_tools(config));

    println!("Checking project layout...");
    checks.extend(check_project(config));

    println!();

    PreflightReport { checks }
}

/// Run preflight and bail if any checks fail.
pub fn run_preflight_or_fail(config: &Config) -> Result<()> {
    let report = run_preflight(config);
    report.print();

    if !report.all_passed() {
        bail!(
            "Preflight failed: {} check(s) failed. Fix the issues above before packaging.",
            report.fail_count()
        );
    }

    println!("All preflight checks passed!\n");
    Ok(())
}

/// Host tools: zip and sh are required, git and the build tool are not.
pub fn check_host_tools(config: &Config) -> Vec<CheckResult> {
    let mut results = vec![
        check_tool_exists("zip", "Required to create the plugin archive. On Windows, install it separately.", true),
        check_tool_exists("sh", "Required to run the build command", true),
        check_tool_exists("git", "Without git the revision falls back to \"dev\"", false),
    ];

    match build_program(&config.build_command) {
        Some(program) => results.push(check_tool_exists(
            program,
            "Required by BUILD_COMMAND (needed unless --skip-build)",
            false,
        )),
        None => results.push(CheckResult::fail("build command", "BUILD_COMMAND has no program")),
    }

    results
}

/// Program a shell command line runs, past any leading `NAME=value` words.
pub fn build_program(command: &str) -> Option<&str> {
    command.split_whitespace().find(|word| !is_env_assignment(word))
}

fn is_env_assignment(word: &str) -> bool {
    match word.split_once('=') {
        Some((name, _)) => {
            let mut chars = name.chars();
            matches!(chars.next(), Some(c) if c == '_' || c.is_ascii_alphabetic())
                && chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
        }
        None => false,
    }
}

fn check_tool_exists(tool: &str, purpose: &str, required: bool) -> CheckResult {
    match process::which(tool) {
        Some(path) => CheckResult::pass_with(tool, &path),
        None => {
            let msg = format!("Not found in PATH. {}", purpose);
            if required {
                CheckResult::fail(tool, &msg)
            } else {
                CheckResult::warn(tool, &msg)
            }
        }
    }
}

/// Manifest, plugin source tree and bootstrap file.
pub fn check_project(config: &Config) -> Vec<CheckResult> {
    let mut results = Vec::new();

    let manifest_path = config.manifest_path();
    match PackageManifest::load(&manifest_path)
        .and_then(|m| m.base_version().map(str::to_string))
    {
        Ok(v) => results.push(CheckResult::pass_with("package.json version", &v)),
        Err(e) => results.push(CheckResult::fail("package.json version", &format!("{:#}", e))),
    }

    if config.plugin_source_dir.is_dir() {
        results.push(CheckResult::pass("plugin source directory"));
    } else {
        results.push(CheckResult::fail(
            "plugin source directory",
            &format!("Not found: {}", config.plugin_source_dir.display()),
        ));
    }

    let main_file = config.source_main_file();
    let content = match fs::read_to_string(&main_file) {
        Ok(c) => {
            results.push(CheckResult::pass("plugin bootstrap file"));
            c
        }
        Err(e) => {
            results.push(CheckResult::fail(
                "plugin bootstrap file",
                &format!("{}: {}", main_file.display(), e),
            ));
            results.push(CheckResult::skip("version markers", "no bootstrap file"));
            results.push(CheckResult::skip("lifecycle hooks", "no bootstrap file"));
            return results;
        }
    };

    match patch::patch_version_markers(&content, "0.0.0", &config.version_constant) {
        Ok((_, report)) if report.complete() => {
            let current = PluginHeader::parse(&content, &config.version_constant)
                .ok()
                .and_then(|h| h.version().map(str::to_string))
                .unwrap_or_else(|| "?".to_string());
            results.push(CheckResult::pass_with("version markers", &format!("currently {}", current)));
        }
        Ok((_, report)) => {
            let status = format!(
                "Not found: {}",
                report.missing(&config.version_constant).join(", ")
            );
            if config.strict_version_patch {
                results.push(CheckResult::fail("version markers", &status));
            } else {
                results.push(CheckResult::warn("version markers", &status));
            }
        }
        Err(e) => results.push(CheckResult::fail("version markers", &format!("{:#}", e))),
    }

    let missing = plugin::missing_hooks(&content);
    if missing.is_empty() {
        results.push(CheckResult::pass("lifecycle hooks"));
    } else {
        results.push(CheckResult::warn(
            "lifecycle hooks",
            &format!("Not registered: {}", missing.join(", ")),
        ));
    }

    results
}
