//! Linux platform-specific settings.

use serde::Deserialize;

/// Debian package (.deb) configuration.
///
/// # Configuration
///
/// Add to `build_pkg.toml`:
///
/// ```toml
/// [linux]
/// elevation_wrapper = "sudo"
/// owner = { user = "builder", group = "builder" }
/// lintian_pedantic = true
/// ```
///
/// # Ownership
///
/// dpkg expects a root-owned tree. Only the two `chown` calls around
/// `dpkg -b` go through `elevation_wrapper`; the rest of the build runs
/// unprivileged. Ownership is handed back to `owner`, or to the invoking
/// user when no owner is configured.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DebianSettings {
    /// Program prefixed to commands that need root.
    ///
    /// Default: `sudo`
    pub elevation_wrapper: String,

    /// Account the staging tree is handed back to after `dpkg -b`.
    ///
    /// Default: None (the invoking user and group)
    pub owner: Option<Owner>,

    /// Run lintian with `--pedantic`.
    ///
    /// Default: true
    pub lintian_pedantic: bool,

    /// Suffix of versions built for the RED Brick.
    ///
    /// Default: `+redbrick`
    pub red_brick_suffix: String,
}

impl Default for DebianSettings {
    fn default() -> Self {
        Self {
            elevation_wrapper: "sudo".to_string(),
            owner: None,
            lintian_pedantic: true,
            red_brick_suffix: "+redbrick".to_string(),
        }
    }
}

/// A `user:group` pair for `chown`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Owner {
    pub user: String,
    pub group: String,
}

impl Owner {
    pub fn new(user: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            group: group.into(),
        }
    }

    pub fn root() -> Self {
        Self::new("root", "root")
    }

    /// `user:group` as accepted by `chown`.
    pub fn spec(&self) -> String {
        format!("{}:{}", self.user, self.group)
    }
}
