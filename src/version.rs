//! Build version identifiers.
//!
//! A build is stamped `base-YYYYMMDD.revision`, e.g. `1.2.3-20240601.abc1234`.
//! The base comes from package.json, the date is the current UTC day and the
//! revision is the short git hash, or `dev` outside a repository.

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::process::Cmd;

/// Revision used when git cannot provide one.
pub const FALLBACK_REVISION: &str = "dev";

/// The subset of package.json we care about.
#[derive(Debug, Deserialize)]
pub struct PackageManifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl PackageManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Invalid JSON in manifest: {}", path.display()))
    }

    /// The `version` field, which must be present and non-empty.
    pub fn base_version(&self) -> Result<&str> {
        match self.version.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => Ok(v),
            _ => bail!("package.json has no \"version\" field"),
        }
    }
}

/// A computed build version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildVersion {
    /// `base-YYYYMMDD.revision`
    Computed {
        base: String,
        date: NaiveDate,
        revision: String,
    },
    /// Supplied verbatim via PLUGIN_VERSION or --version
    Override(String),
}

impl BuildVersion {
    /// Revision component, if this version was computed.
    pub fn revision(&self) -> Option<&str> {
        match self {
            Self::Computed { revision, .. } => Some(revision),
            Self::Override(_) => None,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, Self::Override(_))
    }
}

impl fmt::Display for BuildVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Computed {
                base,
                date,
                revision,
            } => write!(f, "{}-{}.{}", base, date.format("%Y%m%d"), revision),
            Self::Override(v) => f.write_str(v),
        }
    }
}

/// Resolve the build version.
///
/// A non-empty `override_version` wins outright and `lookup_revision` is
/// never called. A failed lookup degrades to [`FALLBACK_REVISION`].
pub fn resolve_version<F>(
    base: &str,
    override_version: Option<&str>,
    date: NaiveDate,
    lookup_revision: F,
) -> BuildVersion
where
    F: FnOnce() -> Option<String>,
{
    if let Some(v) = override_version.filter(|v| !v.is_empty()) {
        return BuildVersion::Override(v.to_string());
    }

    let revision = match lookup_revision() {
        Some(rev) => rev,
        None => {
            eprintln!(
                "  [WARN] Could not get git commit hash, using \"{}\"",
                FALLBACK_REVISION
            );
            FALLBACK_REVISION.to_string()
        }
    };

    BuildVersion::Computed {
        base: base.to_string(),
        date,
        revision,
    }
}

/// Short hash of HEAD in `repo_dir`, or None if git is unavailable.
pub fn git_short_revision(repo_dir: &Path) -> Option<String> {
    let result = Cmd::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .dir(repo_dir)
        .allow_fail()
        .run()
        .ok()?;

    if !result.success() {
        return None;
    }
    let rev = result.stdout_trimmed();
    if rev.is_empty() {
        None
    } else {
        Some(rev.to_string())
    }
}

/// Today's date in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Read the manifest under `root` and compute this run's version.
pub fn current_version(root: &Path, override_version: Option<&str>) -> Result<BuildVersion> {
    let manifest = PackageManifest::load(&root.join("package.json"))?;
    let base = manifest.base_version()?;
    Ok(resolve_version(base, override_version, today_utc(), || {
        git_short_revision(root)
    }))
}
