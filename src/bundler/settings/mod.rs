//! Configuration structures for bundling operations.
//!
//! [`Settings`] is the explicit build context handed to every assembler:
//! build root, layout, compiler environment and the per-platform signing and
//! packaging options. It is assembled by [`SettingsBuilder`] from defaults
//! and an optional packaging manifest.

mod arch;
mod builder;
mod core;
mod linux;
mod macos;
mod package;
mod windows;

// Re-export all public types
pub use arch::Arch;
pub use builder::SettingsBuilder;
pub use core::Settings;
pub use linux::{DebianSettings, Owner};
pub use macos::MacOsSettings;
pub use package::PackageSettings;
pub use windows::WindowsSettings;
