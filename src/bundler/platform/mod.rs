//! Platform-specific artifact assemblers.
//!
//! Each target platform implements [`Assembler`]. The dispatcher picks exactly
//! one per run and hands it a [`BuildContext`]; the shell runner and template
//! specializer are the shared collaborators every assembler goes through.

pub mod linux;
pub mod macos;
pub mod windows;

use crate::bundler::{
    error::{Context, Result},
    settings::Settings,
    shell::{CommandRunner, ShellCommand, single_line},
};
use std::{
    ffi::OsStr,
    fmt,
    path::{Path, PathBuf},
};

/// Artifact kinds produced by the assemblers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PackageType {
    /// macOS disk image
    Dmg,
    /// Windows NSIS installer executable
    Nsis,
    /// Debian package
    Deb,
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PackageType::Dmg => "dmg",
            PackageType::Nsis => "nsis",
            PackageType::Deb => "deb",
        })
    }
}

/// Host operating systems with an assembler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
}

impl Platform {
    /// Maps an OS identifier as reported by `std::env::consts::OS`.
    pub fn from_os(os: &str) -> Option<Self> {
        match os {
            "macos" => Some(Platform::MacOs),
            "windows" => Some(Platform::Windows),
            "linux" => Some(Platform::Linux),
            _ => None,
        }
    }
}

/// Everything an assembler may touch: settings and the command runner.
pub struct BuildContext<'a, R> {
    pub settings: &'a Settings,
    pub runner: &'a R,
}

impl<'a, R: CommandRunner> BuildContext<'a, R> {
    pub fn new(settings: &'a Settings, runner: &'a R) -> Self {
        Self { settings, runner }
    }

    /// Runs a command; a non-zero exit aborts the caller.
    pub async fn run(&self, command: ShellCommand) -> Result<()> {
        self.runner.run(&command).await
    }

    /// Runs a command and returns its stdout.
    pub async fn output(&self, command: ShellCommand) -> Result<String> {
        self.runner.output(&command).await
    }

    /// `make clean` in the daemon source directory.
    pub async fn make_clean(&self) -> Result<()> {
        self.run(
            ShellCommand::new("make")
                .arg("clean")
                .current_dir(self.settings.source_dir()),
        )
        .await
        .context("cleaning build tree")
    }

    /// `make` in the daemon source directory with the compile environment plus `extra_env`.
    pub async fn make<I, K, V>(&self, extra_env: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        self.run(
            ShellCommand::new("make")
                .envs(self.settings.compile_env())
                .envs(extra_env)
                .current_dir(self.settings.source_dir()),
        )
        .await
        .context("compiling")
    }

    /// Asks a freshly built daemon for its version (single line, terminators removed).
    pub async fn query_version(&self, binary: &Path) -> Result<String> {
        let output = self
            .output(ShellCommand::new(binary).arg("--version"))
            .await
            .with_context(|| format!("querying version of {}", binary.display()))?;
        Ok(single_line(&output))
    }
}

/// Builds one platform's artifact.
#[allow(async_fn_in_trait)]
pub trait Assembler {
    /// Kind of artifact this assembler produces.
    fn package_type(&self) -> PackageType;

    /// Runs the full pipeline and returns the path of the finished artifact.
    ///
    /// The staging directory is reset first; on failure it is left in place
    /// for inspection.
    async fn assemble<R: CommandRunner>(&self, ctx: &BuildContext<'_, R>) -> Result<PathBuf>;
}

/// `2.3.1` -> `2_3_1`, as used in macOS and Windows artifact names.
pub fn underscore_version(version: &str) -> String {
    version.replace('.', "_")
}
