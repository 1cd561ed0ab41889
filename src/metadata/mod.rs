//! Packaging manifest (`build_pkg.toml`).
//!
//! Every key is optional; an absent file or section means the defaults that
//! match the brickd repository layout.

use crate::bundler::{DebianSettings, MacOsSettings, PackageSettings, WindowsSettings};
use crate::error::{BundlerError, CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name looked up in the build root when `--config` is not given.
pub const DEFAULT_MANIFEST_NAME: &str = "build_pkg.toml";

/// Parsed packaging manifest.
///
/// ```toml
/// [package]
/// binary_name = "brickd"
/// compiler = "gcc"
///
/// [macos]
/// codesign_identity_file = "codesign_identity"
///
/// [windows]
/// sign_script = "X:\\sign.bat"
///
/// [linux]
/// elevation_wrapper = "sudo"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackagingManifest {
    pub package: PackageSettings,
    pub macos: MacOsSettings,
    pub windows: WindowsSettings,
    pub linux: DebianSettings,
}

impl PackagingManifest {
    /// Parses a manifest from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            BundlerError::Cli(CliError::ExecutionFailed {
                command: "read_manifest".to_string(),
                reason: format!("Failed to read {}: {}", path.display(), e),
            })
        })?;

        Self::from_toml(&text)
    }

    /// Resolves which manifest to use.
    ///
    /// An explicit path must exist. Without one, `<root>/build_pkg.toml` is
    /// used when present and the defaults otherwise.
    pub fn discover(explicit: Option<&Path>, root: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let candidate: PathBuf = root.join(DEFAULT_MANIFEST_NAME);
                if candidate.is_file() {
                    log::debug!("using packaging manifest {}", candidate.display());
                    Self::load(&candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}
