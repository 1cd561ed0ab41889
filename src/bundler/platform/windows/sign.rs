//! Optional Authenticode signing through the site signing script.
//!
//! Signing only happens on build hosts that carry the script; everywhere else
//! it is skipped with a warning.

use super::super::BuildContext;
use crate::bundler::{
    builder::tool_detection::signing_script,
    error::{Context, Result},
    shell::{CommandRunner, ShellCommand},
};
use std::path::Path;

/// Signs `file` if the signing script exists. Returns whether it was signed.
pub async fn sign_if_available<R: CommandRunner>(
    ctx: &BuildContext<'_, R>,
    file: &Path,
) -> Result<bool> {
    let Some(script) = signing_script(ctx.settings) else {
        log::warn!("skipping signing of {}", file.display());
        return Ok(false);
    };

    log::info!("signing {}", file.display());
    ctx.run(ShellCommand::new(script).arg(file))
        .await
        .with_context(|| format!("signing {}", file.display()))?;

    Ok(true)
}
