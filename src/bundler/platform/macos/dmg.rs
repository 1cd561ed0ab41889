//! Disk image creation with `hdiutil`.

use super::super::{BuildContext, underscore_version};
use crate::bundler::{
    error::{Context, Result},
    shell::{CommandRunner, ShellCommand},
    utils::fs,
};
use std::path::PathBuf;

/// Image file name: `brickd_macos_2_3_1.dmg`.
pub fn artifact_name(prefix: &str, version: &str) -> String {
    format!("{}_macos_{}.dmg", prefix, underscore_version(version))
}

/// Volume label: `Brickd-2.3.1`.
pub fn volume_name(prefix: &str, version: &str) -> String {
    format!("{}-{}", prefix, version)
}

/// Creates an HFS+ image of the staging directory in the build root.
///
/// Any image of the same name is removed first.
pub async fn create_dmg<R: CommandRunner>(
    ctx: &BuildContext<'_, R>,
    version: &str,
) -> Result<PathBuf> {
    let settings = ctx.settings;
    let dmg_name = artifact_name(settings.binary_name(), version);
    let dmg_path = settings.root().join(&dmg_name);

    if fs::remove_file_if_exists(&dmg_path).await? {
        log::debug!("removed old {}", dmg_path.display());
    }

    log::info!("creating {}", dmg_path.display());
    ctx.run(
        ShellCommand::new("hdiutil")
            .args(["create", "-fs", "HFS+", "-volname"])
            .arg(volume_name(&settings.macos().volume_name_prefix, version))
            .arg("-srcfolder")
            .arg(settings.staging_dir_relative())
            .arg(&dmg_name)
            .current_dir(settings.root()),
    )
    .await
    .context("creating disk image")?;

    Ok(dmg_path)
}
