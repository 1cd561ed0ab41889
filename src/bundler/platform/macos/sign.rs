//! Code signing with `codesign`.

use super::super::BuildContext;
use crate::bundler::{
    error::{Context, Error, ErrorExt, Result},
    shell::{CommandRunner, ShellCommand},
};
use std::path::Path;

/// Reads the signing identity from the identity file, trimmed.
///
/// An empty file is an error; `codesign` would otherwise fall back to an
/// ad-hoc signature.
pub async fn read_identity(path: &Path) -> Result<String> {
    let identity = tokio::fs::read_to_string(path)
        .await
        .fs_context("reading codesign identity", path)?
        .trim()
        .to_string();

    if identity.is_empty() {
        return Err(Error::GenericError(format!(
            "codesign identity file {} is empty",
            path.display()
        )));
    }

    Ok(identity)
}

/// `codesign --force --verify --verbose --sign <identity> <path>`
pub async fn sign<R: CommandRunner>(
    ctx: &BuildContext<'_, R>,
    identity: &str,
    path: &Path,
) -> Result<()> {
    log::debug!("signing {}", path.display());
    ctx.run(
        ShellCommand::new("codesign")
            .args(["--force", "--verify", "--verbose", "--sign", identity])
            .arg(path),
    )
    .await
    .with_context(|| format!("signing {}", path.display()))
}
