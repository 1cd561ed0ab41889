//! macOS platform-specific settings.

use serde::Deserialize;
use std::path::PathBuf;

/// macOS disk image configuration.
///
/// # Configuration
///
/// Add to `build_pkg.toml`:
///
/// ```toml
/// [macos]
/// codesign_identity_file = "codesign_identity"
/// volume_name_prefix = "Brickd"
/// ```
///
/// # Code Signing
///
/// The identity file holds a single line such as
/// `Developer ID Application: Tinkerforge GmbH (TEAMID)`. It is read when
/// the signing step runs, never at startup.
///
/// # See Also
///
/// - [`WindowsSettings`](super::WindowsSettings) - Windows installer configuration
/// - [`DebianSettings`](super::DebianSettings) - Debian package configuration
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MacOsSettings {
    /// File containing the code signing identity, relative to the build root.
    ///
    /// Default: `codesign_identity`
    pub codesign_identity_file: PathBuf,

    /// Volume name prefix for the disk image; the version is appended.
    ///
    /// Default: `Brickd`
    pub volume_name_prefix: String,

    /// Install name the vendored libusb is linked against at build time.
    ///
    /// Default: `@executable_path/../build_data/macosx/libusb/libusb-1.0.dylib`
    pub libusb_build_install_name: String,
}

impl Default for MacOsSettings {
    fn default() -> Self {
        Self {
            codesign_identity_file: PathBuf::from("codesign_identity"),
            volume_name_prefix: "Brickd".to_string(),
            libusb_build_install_name:
                "@executable_path/../build_data/macosx/libusb/libusb-1.0.dylib".to_string(),
        }
    }
}
