//! Relocation of the bundled libusb dylib.
//!
//! The daemon links against libusb at its in-tree build location. Inside the
//! app bundle the library sits next to the executable, so both its install
//! name and the daemon's load command are rewritten with `install_name_tool`.

use super::super::BuildContext;
use crate::bundler::{
    error::{Context, Result},
    shell::{CommandRunner, ShellCommand},
    utils::fs,
};
use std::path::{Path, PathBuf};

/// File name of the bundled library.
pub const LIBUSB_NAME: &str = "libusb-1.0.dylib";

/// Load path of the bundled library, relative to the executable.
pub fn bundled_install_name() -> String {
    format!("@executable_path/{}", LIBUSB_NAME)
}

/// Copies libusb next to `binary` and points the binary at the copy.
///
/// Returns the path of the copied library.
pub async fn bundle_libusb<R: CommandRunner>(
    ctx: &BuildContext<'_, R>,
    binary: &Path,
) -> Result<PathBuf> {
    let settings = ctx.settings;
    let source = settings
        .build_data("macosx")
        .join("libusb")
        .join(LIBUSB_NAME);
    let macos_dir = binary
        .parent()
        .with_context(|| format!("{} has no parent directory", binary.display()))?;

    log::info!("copying {}", LIBUSB_NAME);
    let dylib = fs::copy_file(&source, &macos_dir.join(LIBUSB_NAME)).await?;

    ctx.run(
        ShellCommand::new("install_name_tool")
            .arg("-id")
            .arg(bundled_install_name())
            .arg(&dylib),
    )
    .await
    .context("setting libusb install name")?;

    ctx.run(
        ShellCommand::new("install_name_tool")
            .arg("-change")
            .arg(&settings.macos().libusb_build_install_name)
            .arg(bundled_install_name())
            .arg(binary),
    )
    .await
    .context("rewriting libusb load path")?;

    Ok(dylib)
}
