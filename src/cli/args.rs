//! Command line argument parsing and validation.

use clap::Parser;
use std::path::{Path, PathBuf};

/// Build and package the Brick Daemon for the current platform
#[derive(Parser, Debug, Default)]
#[command(
    name = "build_pkg",
    version,
    about = "Build and package the Brick Daemon for the current platform",
    long_about = "Compiles brickd and assembles the installer for the host platform:
a .dmg on macOS, an NSIS .exe on Windows, a .deb on Linux.

Run from the brickd repository root (or pass --root). The artifact is written
to the build root; the staging directory is left behind for inspection.

Exit code 0 = artifact exists in the build root."
)]
pub struct Args {
    /// Repository root to build in (defaults to the current directory)
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Packaging manifest (defaults to <root>/build_pkg.toml when present)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Some(root) = &self.root
            && !root.is_dir()
        {
            return Err(format!("build root {} is not a directory", root.display()));
        }

        Ok(())
    }

    /// Build root as given, or the current directory.
    pub fn root_or_cwd(&self) -> std::io::Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir(),
        }
    }

    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }
}
