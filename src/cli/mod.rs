//! Command line interface for the package builder.

mod args;

pub use args::Args;

use crate::{
    bundler::{Bundler, Host, SettingsBuilder, SystemRunner},
    error::{CliError, Result},
    metadata::PackagingManifest,
};

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    run_with(&args).await
}

/// Runs a packaging build for already parsed arguments.
pub async fn run_with(args: &Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let root = args.root_or_cwd()?;
    let manifest = PackagingManifest::discover(args.config(), &root)?;
    let settings = SettingsBuilder::new()
        .root(&root)
        .manifest(manifest)
        .build()?;

    let bundler = Bundler::new(settings, SystemRunner);
    let artifact = bundler.bundle_for(&Host::current()).await?;

    log::info!(
        "created {} ({} bytes, sha256 {})",
        artifact.path.display(),
        artifact.size,
        artifact.checksum
    );
    log::info!("done");

    Ok(0)
}
