//! Windows platform-specific settings.

use serde::Deserialize;
use std::path::PathBuf;

/// Windows NSIS installer configuration.
///
/// # Configuration
///
/// Add to `build_pkg.toml`:
///
/// ```toml
/// [windows]
/// sign_script = "X:\\sign.bat"
/// makensis = "C:\\Program Files\\NSIS\\makensis.exe"
/// ```
///
/// # Code Signing
///
/// Signing is optional. When `sign_script` exists on the build host it is
/// called once for `dist\brickd.exe` and once for the finished installer;
/// otherwise both steps are skipped.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowsSettings {
    /// Batch script that signs the file passed as its only argument.
    ///
    /// Default: `X:\sign.bat`
    pub sign_script: PathBuf,

    /// Preferred makensis location; `PATH` is searched when it is absent.
    ///
    /// Default: `C:\Program Files\NSIS\makensis.exe`
    pub makensis: PathBuf,

    /// Build script run in the daemon source directory.
    ///
    /// Default: `compile.bat`
    pub compile_script: String,
}

impl Default for WindowsSettings {
    fn default() -> Self {
        Self {
            sign_script: PathBuf::from("X:\\sign.bat"),
            makensis: PathBuf::from("C:\\Program Files\\NSIS\\makensis.exe"),
            compile_script: "compile.bat".to_string(),
        }
    }
}
