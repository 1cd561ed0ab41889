//! Core Settings struct and implementations.

use super::{DebianSettings, MacOsSettings, PackageSettings, WindowsSettings};
use std::path::{Path, PathBuf};

/// Build context threaded through every assembler.
///
/// Constructed via [`SettingsBuilder`](super::SettingsBuilder). Holds the
/// absolute build root and resolves every configured relative path against
/// it, so nothing downstream depends on the process working directory.
///
/// # Examples
///
/// ```
/// use brickd_bundler::bundler::SettingsBuilder;
///
/// # fn example() -> brickd_bundler::bundler::Result<()> {
/// let settings = SettingsBuilder::new().root("/src/brickd-repo").build()?;
/// assert!(settings.staging_dir().ends_with("dist"));
/// assert!(settings.daemon_binary().ends_with("brickd/brickd"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Settings {
    root: PathBuf,
    package: PackageSettings,
    macos: MacOsSettings,
    windows: WindowsSettings,
    linux: DebianSettings,
}

impl Settings {
    pub(super) fn new(
        root: PathBuf,
        package: PackageSettings,
        macos: MacOsSettings,
        windows: WindowsSettings,
        linux: DebianSettings,
    ) -> Self {
        Self {
            root,
            package,
            macos,
            windows,
            linux,
        }
    }

    /// Absolute build root; artifacts are written here.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `path` against the build root.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Binary name, also the artifact name prefix.
    pub fn binary_name(&self) -> &str {
        &self.package.binary_name
    }

    /// Daemon source directory (where make runs).
    pub fn source_dir(&self) -> PathBuf {
        self.resolve(&self.package.source_dir)
    }

    /// Compiled daemon as produced by make.
    pub fn daemon_binary(&self) -> PathBuf {
        self.source_dir().join(self.binary_name())
    }

    /// Static installer data for one platform, e.g. `build_data/linux`.
    pub fn build_data(&self, platform: &str) -> PathBuf {
        self.resolve(&self.package.build_data_dir).join(platform)
    }

    /// Staging directory.
    pub fn staging_dir(&self) -> PathBuf {
        self.resolve(&self.package.staging_dir)
    }

    /// Staging directory as configured, for tools that run in the root.
    pub fn staging_dir_relative(&self) -> &Path {
        &self.package.staging_dir
    }

    pub fn compiler(&self) -> &str {
        &self.package.compiler
    }

    /// Environment for compile steps: `CC` plus configured extras.
    pub fn compile_env(&self) -> Vec<(String, String)> {
        let mut env = vec![("CC".to_string(), self.compiler().to_string())];
        env.extend(
            self.package
                .build_env
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        env
    }

    pub fn changelog(&self) -> PathBuf {
        self.resolve(&self.package.changelog)
    }

    pub fn macos(&self) -> &MacOsSettings {
        &self.macos
    }

    pub fn windows(&self) -> &WindowsSettings {
        &self.windows
    }

    pub fn linux(&self) -> &DebianSettings {
        &self.linux
    }
}
