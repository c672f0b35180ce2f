//! Archive creation via the system `zip` utility.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::process::Cmd;

/// Platform metadata files never shipped in the archive.
pub const EXCLUDE_PATTERNS: &[&str] = &["*.DS_Store"];

const ZIP_HINT: &str = "Note: This requires the zip command. \
On Windows, you may need to install it separately (e.g. via Git for Windows or `choco install zip`).";

/// A finished archive.
#[derive(Debug, Clone)]
pub struct Archive {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub sha256: String,
}

impl Archive {
    /// Size in mebibytes.
    pub fn size_mib(&self) -> f64 {
        self.size_bytes as f64 / 1024.0 / 1024.0
    }

    pub fn checksum_path(&self) -> PathBuf {
        checksum_path(&self.path)
    }
}

/// `<archive>.sha256`
pub fn checksum_path(archive: &Path) -> PathBuf {
    let mut name = archive.as_os_str().to_os_string();
    name.push(".sha256");
    PathBuf::from(name)
}

/// Remove an existing archive and its checksum. Returns true if one existed.
pub fn remove_existing(archive: &Path) -> Result<bool> {
    let existed = archive.exists();
    if existed {
        fs::remove_file(archive)
            .with_context(|| format!("Failed to remove old archive {}", archive.display()))?;
    }
    let checksum = checksum_path(archive);
    if checksum.exists() {
        fs::remove_file(&checksum)?;
    }
    Ok(existed)
}

/// Compress the contents of `staging_dir` into `archive`.
///
/// Entries are stored relative to the staging root.
pub fn compress_dir(staging_dir: &Path, archive: &Path) -> Result<Archive> {
    compress_dir_with("zip", staging_dir, archive)
}

/// [`compress_dir`] with an explicit zip-compatible program.
pub fn compress_dir_with(program: &str, staging_dir: &Path, archive: &Path) -> Result<Archive> {
    if let Some(parent) = archive.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    remove_existing(archive)?;

    // zip resolves a relative output path against its cwd (the staging dir)
    let archive_abs = if archive.is_absolute() {
        archive.to_path_buf()
    } else {
        std::env::current_dir()?.join(archive)
    };

    let mut cmd = Cmd::new(program)
        .args(["-r", "-q"])
        .arg_path(&archive_abs)
        .arg(".")
        .arg("-x");
    for pattern in EXCLUDE_PATTERNS {
        cmd = cmd.arg(pattern);
    }
    cmd.dir(staging_dir)
        .error_msg("Zip creation failed")
        .missing_hint(ZIP_HINT)
        .run_interactive()?;

    let size_bytes = fs::metadata(archive)
        .with_context(|| format!("{} did not produce {}", program, archive.display()))?
        .len();
    let sha256 = write_checksum(archive)?;

    Ok(Archive {
        path: archive.to_path_buf(),
        size_bytes,
        sha256,
    })
}

/// Hex SHA-256 of a file.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file =
        fs::File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Write `<archive>.sha256` in sha256sum format and return the digest.
pub fn write_checksum(archive: &Path) -> Result<String> {
    let digest = sha256_file(archive)?;
    let file_name = archive
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    fs::write(checksum_path(archive), format!("{}  {}\n", digest, file_name))?;
    Ok(digest)
}
