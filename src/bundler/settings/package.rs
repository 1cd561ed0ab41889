//! Package metadata and build layout.

use serde::Deserialize;
use std::{collections::BTreeMap, path::PathBuf};

/// Package metadata and build layout shared by every platform.
///
/// All paths are relative to the build root unless absolute.
///
/// # Examples
///
/// ```
/// use brickd_bundler::bundler::PackageSettings;
///
/// let settings = PackageSettings {
///     compiler: "clang".into(),
///     ..Default::default()
/// };
/// assert_eq!(settings.binary_name, "brickd");
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageSettings {
    /// Name of the daemon binary and prefix of every artifact name.
    ///
    /// Default: `brickd`
    pub binary_name: String,

    /// Directory containing the daemon sources and Makefile.
    ///
    /// Default: `brickd`
    pub source_dir: PathBuf,

    /// Directory holding the static installer skeletons.
    ///
    /// Default: `build_data`
    pub build_data_dir: PathBuf,

    /// Scratch directory mirroring the artifact layout.
    ///
    /// Wiped at the start of every build.
    ///
    /// Default: `dist`
    pub staging_dir: PathBuf,

    /// Value of `CC` for make-based builds.
    ///
    /// Default: `gcc`
    pub compiler: String,

    /// Extra environment passed to every compile step.
    ///
    /// Default: empty
    pub build_env: BTreeMap<String, String>,

    /// Changelog shipped in the Debian package.
    ///
    /// Default: `changelog`
    pub changelog: PathBuf,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            binary_name: "brickd".to_string(),
            source_dir: PathBuf::from("brickd"),
            build_data_dir: PathBuf::from("build_data"),
            staging_dir: PathBuf::from("dist"),
            compiler: "gcc".to_string(),
            build_env: BTreeMap::new(),
            changelog: PathBuf::from("changelog"),
        }
    }
}
