//! Builder for constructing Settings.

use super::{DebianSettings, MacOsSettings, PackageSettings, Settings, WindowsSettings};
use crate::bundler::error::{ErrorExt, Result};
use crate::metadata::PackagingManifest;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};

/// Builder for constructing [`Settings`].
///
/// Every section falls back to its defaults, which mirror the layout of the
/// brickd repository (`brickd/`, `build_data/`, `dist/`).
///
/// # Examples
///
/// ```
/// use brickd_bundler::bundler::{PackageSettings, SettingsBuilder};
///
/// # fn example() -> brickd_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new()
///     .root("/work/brickd")
///     .package_settings(PackageSettings {
///         staging_dir: "stage".into(),
///         ..Default::default()
///     })
///     .build()?;
/// assert!(settings.staging_dir().ends_with("stage"));
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct SettingsBuilder {
    root: Option<PathBuf>,
    package: PackageSettings,
    macos: MacOsSettings,
    windows: WindowsSettings,
    linux: DebianSettings,
}

impl SettingsBuilder {
    /// Creates a new settings builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the build root.
    ///
    /// Default: the current working directory
    pub fn root<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Applies every section of a packaging manifest.
    pub fn manifest(mut self, manifest: PackagingManifest) -> Self {
        self.package = manifest.package;
        self.macos = manifest.macos;
        self.windows = manifest.windows;
        self.linux = manifest.linux;
        self
    }

    pub fn package_settings(mut self, settings: PackageSettings) -> Self {
        self.package = settings;
        self
    }

    pub fn macos_settings(mut self, settings: MacOsSettings) -> Self {
        self.macos = settings;
        self
    }

    pub fn windows_settings(mut self, settings: WindowsSettings) -> Self {
        self.windows = settings;
        self
    }

    pub fn linux_settings(mut self, settings: DebianSettings) -> Self {
        self.linux = settings;
        self
    }

    /// Builds the settings with an absolute root.
    ///
    /// # Errors
    ///
    /// Fails if the current directory cannot be determined or the root cannot
    /// be made absolute.
    pub fn build(self) -> Result<Settings> {
        let root = match self.root {
            Some(root) => root,
            None => std::env::current_dir().fs_context("reading current directory", ".")?,
        };
        let root = root
            .absolutize()
            .fs_context("absolutizing build root", &root)?
            .into_owned();

        Ok(Settings::new(
            root,
            self.package,
            self.macos,
            self.windows,
            self.linux,
        ))
    }
}
