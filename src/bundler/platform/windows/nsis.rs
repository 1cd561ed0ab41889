//! NSIS installer script preparation and compilation.

use super::super::{BuildContext, underscore_version};
use crate::bundler::{
    builder::tool_detection::locate_makensis,
    error::{Context, Result},
    shell::{CommandRunner, ShellCommand},
    template::{Replacements, replacements, specialize},
};
use std::path::{Path, PathBuf};

/// Template shipped under `build_data/windows/nsis`.
pub const SCRIPT_TEMPLATE: &str = "brickd_installer.nsi.template";

/// Specialized script written to `<staging>/nsis`.
pub const SCRIPT_NAME: &str = "brickd_installer.nsi";

/// Installer file name: `brickd_windows_2_3_1.exe`.
pub fn artifact_name(prefix: &str, version: &str) -> String {
    format!("{}_windows_{}.exe", prefix, underscore_version(version))
}

/// Version tokens used by the installer script.
pub fn script_replacements(version: &str) -> Replacements {
    replacements([
        ("<<BRICKD_DOT_VERSION>>", version.to_string()),
        ("<<BRICKD_UNDERSCORE_VERSION>>", underscore_version(version)),
    ])
}

/// Specializes the installer script template into the staging directory.
pub async fn prepare_script(template: &Path, staging: &Path, version: &str) -> Result<PathBuf> {
    let script = staging.join("nsis").join(SCRIPT_NAME);
    if let Some(dir) = script.parent() {
        crate::bundler::utils::fs::create_dir_all(dir, false).await?;
    }

    specialize(template, &script, &script_replacements(version)).await?;
    Ok(script)
}

/// Compiles `script` with makensis. The installer lands next to the script.
pub async fn run_makensis<R: CommandRunner>(ctx: &BuildContext<'_, R>, script: &Path) -> Result<()> {
    let makensis = locate_makensis(ctx.settings)?;

    log::info!("running {}", makensis.display());
    ctx.run(ShellCommand::new(makensis).arg(script))
        .await
        .context("compiling NSIS installer")
}
