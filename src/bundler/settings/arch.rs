//! CPU architecture types and utilities.

use std::fmt;

/// Debian architecture of the build host, as printed by
/// `dpkg --print-architecture`.
///
/// The architecture ends up in the package file name and in
/// `DEBIAN/control`, and selects the compiler flags.
///
/// # Examples
///
/// ```
/// use brickd_bundler::bundler::Arch;
///
/// let arch = Arch::from_dpkg("armhf");
/// assert_eq!(arch, Arch::Armhf);
/// assert_eq!(arch.to_string(), "armhf");
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Arch {
    /// amd64 (64-bit x86)
    Amd64,
    /// i386 (32-bit x86) - built with `-march=i386`
    I386,
    /// arm64 / AArch64
    Arm64,
    /// ARM with hard-float (32-bit) - Raspberry Pi, RED Brick
    Armhf,
    /// ARM with soft-float (32-bit)
    Armel,
    /// Anything else dpkg reports
    Other(String),
}

impl Arch {
    /// Parses dpkg's architecture name. Surrounding whitespace is ignored.
    pub fn from_dpkg(name: &str) -> Self {
        match name.trim() {
            "amd64" => Arch::Amd64,
            "i386" => Arch::I386,
            "arm64" => Arch::Arm64,
            "armhf" => Arch::Armhf,
            "armel" => Arch::Armel,
            other => Arch::Other(other.to_string()),
        }
    }

    /// dpkg's name for this architecture.
    pub fn as_dpkg_str(&self) -> &str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::I386 => "i386",
            Arch::Arm64 => "arm64",
            Arch::Armhf => "armhf",
            Arch::Armel => "armel",
            Arch::Other(name) => name,
        }
    }

    /// Extra `CFLAGS` needed to target this architecture, if any.
    pub fn cflags(&self) -> Option<&'static str> {
        match self {
            Arch::I386 => Some("-march=i386"),
            _ => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_dpkg_str())
    }
}
