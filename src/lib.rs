//! Build-and-package tool for the Brick Daemon.
//!
//! Compiles `brickd` and produces the installer for the host platform:
//! - macOS disk image (.dmg)
//! - Windows installer (.exe via NSIS)
//! - Debian package (.deb)
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod bundler;
pub mod cli;
pub mod error;
pub mod metadata;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
