//! Windows NSIS installer assembler.
//!
//! Runs the batch build, signs the daemon where possible, stages the
//! installer resources and compiles the specialized NSIS script.

pub mod nsis;
pub mod sign;

use super::{Assembler, BuildContext, PackageType};
use crate::bundler::{
    error::{Context, Result},
    shell::{CommandRunner, ShellCommand},
    utils::fs,
};
use std::path::PathBuf;

/// Files copied verbatim from `build_data/windows` into the staging directory.
pub const RESOURCE_FILES: &[&str] = &["readme.txt", "brickd.ini", "logviewer/logviewer.exe"];

/// Windows `.exe` installer assembler.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowsAssembler;

impl Assembler for WindowsAssembler {
    fn package_type(&self) -> PackageType {
        PackageType::Nsis
    }

    async fn assemble<R: CommandRunner>(&self, ctx: &BuildContext<'_, R>) -> Result<PathBuf> {
        let settings = ctx.settings;
        let staging = settings.staging_dir();
        let build_data = settings.build_data("windows");

        log::info!("removing old build directories");
        fs::create_dir_all(&staging, true).await?;

        log::info!("compiling");
        let source_dir = settings.source_dir();
        ctx.run(
            ShellCommand::new(source_dir.join(&settings.windows().compile_script))
                .current_dir(&source_dir),
        )
        .await
        .context("compiling")?;

        let binary = staging.join(format!("{}.exe", settings.binary_name()));
        sign::sign_if_available(ctx, &binary).await?;

        log::info!("creating NSIS script from template");
        let version = ctx.query_version(&binary).await?;
        let script = nsis::prepare_script(
            &build_data.join("nsis").join(nsis::SCRIPT_TEMPLATE),
            &staging,
            &version,
        )
        .await?;

        log::info!("copying installer resources");
        fs::copy_dir(&build_data.join("drivers"), &staging.join("drivers")).await?;
        for resource in RESOURCE_FILES {
            fs::copy_file(&build_data.join(resource), &staging).await?;
        }

        nsis::run_makensis(ctx, &script).await?;

        let installer_name = nsis::artifact_name(settings.binary_name(), &version);
        let installer = settings.root().join(&installer_name);
        fs::remove_file_if_exists(&installer).await?;
        fs::move_file(&staging.join("nsis").join(&installer_name), &installer).await?;

        sign::sign_if_available(ctx, &installer).await?;

        Ok(installer)
    }
}
