//! Host detection and assembler selection.

use crate::bundler::{
    error::{Error, ErrorExt, Result},
    platform::{
        Assembler, BuildContext, PackageType, Platform, linux::DebianAssembler,
        macos::MacOsAssembler, windows::WindowsAssembler,
    },
    privilege,
    settings::Settings,
    shell::CommandRunner,
};
use std::path::PathBuf;

use super::checksum::calculate_sha256;

/// The machine a run executes on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Host {
    /// OS identifier in `std::env::consts::OS` form.
    pub os: String,
    /// Whether the process has an effective uid of 0.
    pub privileged: bool,
}

impl Host {
    /// Describes the running process.
    pub fn current() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            privileged: privilege::running_as_root(),
        }
    }

    /// Privileged runs are refused everywhere except Windows.
    fn refuses_privileged(&self) -> bool {
        self.privileged && self.os != "windows"
    }
}

/// A finished installer artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundledArtifact {
    pub package_type: PackageType,
    /// Absolute path in the build root.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Lowercase hex SHA-256.
    pub checksum: String,
}

/// Selects and runs the assembler for a host.
///
/// Generic over the [`CommandRunner`] so the whole pipeline can run against a
/// recording runner.
#[derive(Debug)]
pub struct Bundler<R> {
    settings: Settings,
    runner: R,
}

impl<R: CommandRunner> Bundler<R> {
    pub fn new(settings: Settings, runner: R) -> Self {
        Self { settings, runner }
    }

    /// Builds the single artifact for `host`.
    ///
    /// # Errors
    ///
    /// - [`Error::PrivilegedUser`] for a privileged user on a non-Windows
    ///   host, before any file is touched or command is run
    /// - [`Error::UnsupportedPlatform`] for an OS without an assembler
    /// - whatever the assembler fails with
    pub async fn bundle_for(&self, host: &Host) -> Result<BundledArtifact> {
        if host.refuses_privileged() {
            return Err(Error::PrivilegedUser);
        }

        let platform = Platform::from_os(&host.os)
            .ok_or_else(|| Error::UnsupportedPlatform(host.os.clone()))?;

        let ctx = BuildContext::new(&self.settings, &self.runner);
        let (package_type, path) = match platform {
            Platform::MacOs => run_assembler(&MacOsAssembler, &host.os, &ctx).await?,
            Platform::Windows => run_assembler(&WindowsAssembler, &host.os, &ctx).await?,
            Platform::Linux => run_assembler(&DebianAssembler, &host.os, &ctx).await?,
        };

        let size = tokio::fs::metadata(&path)
            .await
            .fs_context("reading artifact metadata", &path)?
            .len();
        let checksum = calculate_sha256(&path).await?;

        Ok(BundledArtifact {
            package_type,
            path,
            size,
            checksum,
        })
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }
}

async fn run_assembler<A: Assembler, R: CommandRunner>(
    assembler: &A,
    os: &str,
    ctx: &BuildContext<'_, R>,
) -> Result<(PackageType, PathBuf)> {
    let package_type = assembler.package_type();
    log::info!("packaging for {} ({})", os, package_type);
    let path = assembler.assemble(ctx).await?;
    Ok((package_type, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_only_accepted_on_windows() {
        let host = |os: &str, privileged| Host {
            os: os.to_string(),
            privileged,
        };

        assert!(host("linux", true).refuses_privileged());
        assert!(host("macos", true).refuses_privileged());
        assert!(host("freebsd", true).refuses_privileged());
        assert!(!host("windows", true).refuses_privileged());
        assert!(!host("linux", false).refuses_privileged());
    }
}
