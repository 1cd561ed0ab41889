//! External tool detection and availability checking.
//!
//! Optional tools (the Windows signing script) are existence-checked and
//! skipped when absent; required tools are located or reported with a
//! descriptive error.

use crate::bundler::{
    error::{Error, Result},
    settings::Settings,
};
use std::path::{Path, PathBuf};

/// Returns the signing script if it exists on this build host.
pub fn signing_script(settings: &Settings) -> Option<&Path> {
    let script = settings.windows().sign_script.as_path();
    if script.is_file() {
        log::debug!("Found signing script at: {}", script.display());
        Some(script)
    } else {
        log::debug!(
            "signing script {} not present, signing will be skipped",
            script.display()
        );
        None
    }
}

/// Locates makensis.
///
/// The configured installation path wins; otherwise `PATH` is searched.
pub fn locate_makensis(settings: &Settings) -> Result<PathBuf> {
    let configured = &settings.windows().makensis;
    if configured.is_file() {
        return Ok(configured.clone());
    }

    match which::which("makensis") {
        Ok(path) => {
            log::debug!("Found makensis at: {}", path.display());
            Ok(path)
        }
        Err(e) => Err(Error::GenericError(format!(
            "makensis not found at {} or in PATH ({}). Please install NSIS",
            configured.display(),
            e
        ))),
    }
}
