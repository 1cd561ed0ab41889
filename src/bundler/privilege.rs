//! Privilege checks and the narrow elevated operation used by the Debian build.
//!
//! The pipeline itself never runs as root. Only the ownership change around
//! `dpkg -b` is escalated, through [`Elevation`].

use crate::bundler::{
    error::{Context, Result},
    settings::Owner,
    shell::{CommandRunner, ShellCommand},
};
use std::path::Path;

/// Whether the current process runs with an effective uid of 0.
#[cfg(unix)]
pub fn running_as_root() -> bool {
    users::get_effective_uid() == 0
}

/// Administrator status is not checked outside Unix.
#[cfg(not(unix))]
pub fn running_as_root() -> bool {
    false
}

/// The user and primary group of the invoking account.
#[cfg(unix)]
pub fn invoking_owner() -> Result<Owner> {
    let user = users::get_current_username()
        .context("cannot determine the invoking user name")?;
    let group = users::get_current_groupname()
        .context("cannot determine the invoking group name")?;

    Ok(Owner::new(
        user.to_string_lossy().into_owned(),
        group.to_string_lossy().into_owned(),
    ))
}

#[cfg(not(unix))]
pub fn invoking_owner() -> Result<Owner> {
    crate::bail!("ownership changes are only supported on Unix hosts")
}

/// Capability to run a single command with elevated rights.
///
/// Wraps commands in a privilege-escalation program such as `sudo`. It only
/// exposes the ownership change the Debian build needs.
#[derive(Clone, Debug)]
pub struct Elevation {
    wrapper: String,
}

impl Elevation {
    pub fn new(wrapper: impl Into<String>) -> Self {
        Self {
            wrapper: wrapper.into(),
        }
    }

    fn wrap(&self, command: ShellCommand) -> ShellCommand {
        let mut wrapped = ShellCommand::new(&self.wrapper).arg(command.program());
        wrapped = wrapped.args(command.get_args());
        if let Some(dir) = command.get_current_dir() {
            wrapped = wrapped.current_dir(dir);
        }
        wrapped
    }

    /// `chown -R owner path`, escalated.
    pub async fn chown_recursive<R: CommandRunner>(
        &self,
        runner: &R,
        path: &Path,
        owner: &Owner,
    ) -> Result<()> {
        let chown = ShellCommand::new("chown")
            .args(["-R", &owner.spec()])
            .arg(path);

        runner
            .run(&self.wrap(chown))
            .await
            .with_context(|| format!("changing owner of {} to {}", path.display(), owner.spec()))
    }
}
