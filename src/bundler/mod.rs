//! Build-and-package pipeline for the Brick Daemon.
//!
//! Compiles `brickd` and assembles exactly one installer artifact for the
//! host: a disk image on macOS, an NSIS installer on Windows or a Debian
//! package on Linux.
//!
//! - [`shell`] runs external tools behind the [`CommandRunner`] seam
//! - [`template`] specializes installer metadata templates
//! - [`platform`] holds the three [`Assembler`]s
//! - [`builder`] dispatches to one of them and reports the artifact

pub mod builder;
pub mod error;
pub mod platform;
pub mod privilege;
pub mod settings;
pub mod shell;
pub mod template;
pub mod utils;

pub use builder::{BundledArtifact, Bundler, Host};
pub use error::{Context, Error, ErrorExt, Result};
pub use platform::{Assembler, BuildContext, PackageType, Platform};
pub use settings::{
    Arch, DebianSettings, MacOsSettings, Owner, PackageSettings, Settings, SettingsBuilder,
    WindowsSettings,
};
pub use shell::{CommandRunner, ShellCommand, SystemRunner};
