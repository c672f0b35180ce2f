//! Version stamping of the staged plugin bootstrap file.
//!
//! Two markers are rewritten, each at most once:
//!
//! ```text
//!  * Version: 0.0.0-dev
//! define('OIAA_MEETINGS_VERSION', '0.0.0-dev');
//! ```

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fs;
use std::path::Path;

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\* Version:\s+)[\d.\-a-z]+").expect("valid header regex"));

/// Which markers a patch pass rewrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchReport {
    pub header: bool,
    pub constant: bool,
}

impl PatchReport {
    pub fn complete(&self) -> bool {
        self.header && self.constant
    }

    /// Human-readable names of the markers that were not found.
    pub fn missing(&self, constant_name: &str) -> Vec<String> {
        let mut missing = Vec::new();
        if !self.header {
            missing.push("Version header".to_string());
        }
        if !self.constant {
            missing.push(format!("{} constant", constant_name));
        }
        missing
    }
}

fn constant_pattern(constant_name: &str) -> Result<Regex> {
    Regex::new(&format!(
        r"(?i)(define\('{}',\s*')[\d.\-a-z]+('\);)",
        regex::escape(constant_name)
    ))
    .with_context(|| format!("Invalid version constant name: {}", constant_name))
}

/// Value of `define('<constant_name>', '...')`, if declared.
pub fn constant_value(content: &str, constant_name: &str) -> Result<Option<String>> {
    let re = Regex::new(&format!(
        r#"(?i)define\(\s*['"]{}['"]\s*,\s*['"]([^'"]*)['"]\s*\)"#,
        regex::escape(constant_name)
    ))
    .with_context(|| format!("Invalid version constant name: {}", constant_name))?;
    Ok(re.captures(content).map(|caps| caps[1].to_string()))
}

/// Rewrite both version markers in `content`.
///
/// A marker that does not match leaves the text unchanged for that field.
pub fn patch_version_markers(
    content: &str,
    version: &str,
    constant_name: &str,
) -> Result<(String, PatchReport)> {
    let constant_re = constant_pattern(constant_name)?;

    let header = HEADER_RE.is_match(content);
    let content = HEADER_RE.replacen(content, 1, |caps: &Captures| {
        format!("{}{}", &caps[1], version)
    });

    let constant = constant_re.is_match(&content);
    let content = constant_re.replacen(&content, 1, |caps: &Captures| {
        format!("{}{}{}", &caps[1], version, &caps[2])
    });

    Ok((content.into_owned(), PatchReport { header, constant }))
}

/// Patch the file at `path` in place.
pub fn patch_file(path: &Path, version: &str, constant_name: &str) -> Result<PatchReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let (patched, report) = patch_version_markers(&content, version, constant_name)?;
    fs::write(path, patched).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(report)
}

/// Re-read the patched file and check every rewritten marker holds `version`.
///
/// Markers are located with the same shapes used for patching, so the check
/// does not depend on how the header comment is laid out.
pub fn verify_file(path: &Path, version: &str, constant_name: &str, report: &PatchReport) -> Result<()> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let escaped = regex::escape(version);

    if report.header {
        let stamped = Regex::new(&format!(r"(?im)\* Version:\s+{}(?:$|[^\d.\-a-z])", escaped))
            .context("Failed to build header check")?;
        if !stamped.is_match(&content) {
            bail!(
                "Version header in {} does not read {} after patching",
                path.display(),
                version
            );
        }
    }
    if report.constant {
        let stamped = Regex::new(&format!(
            r"(?i)define\('{}',\s*'{}'\);",
            regex::escape(constant_name),
            escaped
        ))
        .context("Failed to build constant check")?;
        if !stamped.is_match(&content) {
            bail!(
                "{} in {} reads {:?} after patching, expected {}",
                constant_name,
                path.display(),
                constant_value(&content, constant_name)?,
                version
            );
        }
    }
    Ok(())
}
