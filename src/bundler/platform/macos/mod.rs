//! macOS disk image assembler.
//!
//! Builds the daemon, lays out `brickd.app` inside the installer skeleton,
//! relocates libusb into the bundle, signs the installer stub, the library
//! and the app, and wraps the staging directory into a `.dmg`.

pub mod dmg;
pub mod dylib;
pub mod sign;

use super::{Assembler, BuildContext, PackageType};
use crate::bundler::{
    error::Result,
    shell::CommandRunner,
    template::{replacements, specialize},
    utils::fs,
};
use std::path::PathBuf;

/// macOS `.dmg` assembler.
#[derive(Debug, Default, Clone, Copy)]
pub struct MacOsAssembler;

impl Assembler for MacOsAssembler {
    fn package_type(&self) -> PackageType {
        PackageType::Dmg
    }

    async fn assemble<R: CommandRunner>(&self, ctx: &BuildContext<'_, R>) -> Result<PathBuf> {
        let settings = ctx.settings;
        let name = settings.binary_name();
        let staging = settings.staging_dir();

        log::info!("removing old build directories");
        fs::remove_dir_all(&staging).await?;

        log::info!("compiling");
        ctx.make_clean().await?;
        ctx.make(std::iter::empty::<(&str, &str)>()).await?;

        log::info!("copying installer data");
        fs::copy_dir(&settings.build_data("macosx").join("installer"), &staging).await?;

        let app = staging.join("data").join(format!("{name}.app"));
        let contents = app.join("Contents");
        let macos_dir = contents.join("MacOS");
        fs::create_dir_all(&macos_dir, false).await?;

        log::info!("copying {} binary", name);
        let binary = fs::copy_file(&settings.daemon_binary(), &macos_dir.join(name)).await?;

        log::info!("patching Info.plist");
        let version = ctx.query_version(&binary).await?;
        let info_plist = contents.join("Info.plist");
        specialize(
            &info_plist,
            &info_plist,
            &replacements([("<<VERSION>>", version.as_str())]),
        )
        .await?;

        let dylib = dylib::bundle_libusb(ctx, &binary).await?;

        log::info!("signing");
        let identity =
            sign::read_identity(&settings.resolve(&settings.macos().codesign_identity_file))
                .await?;
        sign::sign(ctx, &identity, &staging.join("INSTALL.app")).await?;
        sign::sign(ctx, &identity, &dylib).await?;
        sign::sign(ctx, &identity, &app).await?;

        dmg::create_dmg(ctx, &version).await
    }
}
