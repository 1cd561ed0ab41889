//! Artifact checksum calculation.
//!
//! SHA-256 for the artifact report and MD5 for Debian's `DEBIAN/md5sums`.

use crate::bundler::error::{ErrorExt, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Calculates the SHA-256 checksum of a file.
///
/// Reads the file in 8KB chunks so large installers are not loaded at once.
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash (64 characters)
/// * `Err` - If the file cannot be read
pub async fn calculate_sha256(file_path: &Path) -> Result<String> {
    let mut file = tokio::fs::File::open(file_path)
        .await
        .fs_context("opening file for hashing", file_path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .await
            .fs_context("reading file for hash calculation", file_path)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Builds `md5sum`-compatible lines for every regular file below `base/subdir`.
///
/// Paths are written relative to `base` and sorted, e.g.
/// `d41d8cd98f00b204e9800998ecf8427e  usr/bin/brickd`. An unreadable
/// directory anywhere in the tree is an error.
pub async fn md5sum_lines(base: &Path, subdir: &str) -> Result<String> {
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(base.join(subdir)).follow_links(false) {
        let entry = entry?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();

    let mut lines = String::new();
    for path in files {
        let content = tokio::fs::read(&path)
            .await
            .fs_context("reading file for md5sums", &path)?;
        let relative = path.strip_prefix(base)?;
        let relative = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        lines.push_str(&format!("{:x}  {}\n", md5::compute(&content), relative));
    }

    Ok(lines)
}
