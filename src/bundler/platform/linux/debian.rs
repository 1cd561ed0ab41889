//! Debian package (.deb) assembler.
//!
//! Builds the daemon for the host architecture, fills the `build_data/linux`
//! skeleton, specializes `DEBIAN/control`, normalizes checksums and modes,
//! and hands the tree to `dpkg -b` and `lintian`.
//!
//! # Process
//!
//! 1. Reset the staging directory
//! 2. Query the architecture (`dpkg --print-architecture`)
//! 3. `make clean` + `make` with udev/pm-utils support
//! 4. Copy the skeleton and the binary
//! 5. Specialize `DEBIAN/control` with version, architecture, installed size
//! 6. Strip the binary, ship the changelog
//! 7. Pick the configuration variant from the version suffix
//! 8. gzip docs, write md5sums, normalize modes
//! 9. Build the package as root-owned tree, then hand the tree back
//! 10. Lint with lintian
//! 11. `make clean` (best effort)

use super::super::{Assembler, BuildContext, PackageType};
use crate::bundler::{
    builder::checksum::md5sum_lines,
    error::{Context, ErrorExt, Result},
    privilege::{self, Elevation},
    settings::{Arch, Owner, Settings},
    shell::{CommandRunner, ShellCommand, single_line},
    template::{replacements, specialize},
    utils::fs,
};
use flate2::{Compression, write::GzEncoder};
use std::{
    ffi::OsString,
    io::Write,
    path::{Path, PathBuf},
};
use tokio::io::AsyncWriteExt;

/// Mode applied to every directory in the package tree.
const DIR_MODE: u32 = 0o755;

/// Debian package assembler.
#[derive(Debug, Default, Clone, Copy)]
pub struct DebianAssembler;

/// `brickd-2.3.1_amd64.deb`
pub fn artifact_name(prefix: &str, version: &str, arch: &Arch) -> String {
    format!("{}-{}_{}.deb", prefix, version, arch)
}

/// Debian versions may not contain spaces (`2.4.0 beta` -> `2.4.0-beta`).
pub fn package_version(version: &str) -> String {
    version.replace(' ', "-")
}

/// Which shipped configuration file becomes `etc/<name>.conf`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigVariant {
    /// `etc/<name>-default.conf`
    Default,
    /// `etc/<name>-red-brick.conf`
    RedBrick,
}

impl ConfigVariant {
    /// Versions ending in `suffix` are RED Brick builds.
    pub fn for_version(version: &str, red_brick_suffix: &str) -> Self {
        if version.ends_with(red_brick_suffix) {
            ConfigVariant::RedBrick
        } else {
            ConfigVariant::Default
        }
    }
}

/// Fixed modes for individual package files, relative to the staging root.
///
/// dpkg and lintian check these; every listed file must exist.
pub fn file_modes(name: &str) -> Vec<(String, u32)> {
    vec![
        ("DEBIAN/conffiles".to_string(), 0o644),
        ("DEBIAN/md5sums".to_string(), 0o644),
        ("DEBIAN/preinst".to_string(), 0o755),
        ("DEBIAN/postinst".to_string(), 0o755),
        ("DEBIAN/prerm".to_string(), 0o755),
        ("DEBIAN/postrm".to_string(), 0o755),
        (format!("usr/bin/{name}"), 0o755),
        (format!("etc/{name}.conf"), 0o644),
        (format!("etc/init.d/{name}"), 0o755),
        (format!("etc/logrotate.d/{name}"), 0o644),
        (format!("usr/share/doc/{name}/changelog.gz"), 0o644),
        (format!("usr/share/doc/{name}/copyright"), 0o644),
        (format!("usr/share/man/man8/{name}.8.gz"), 0o644),
        (format!("usr/share/man/man5/{name}.conf.5.gz"), 0o644),
        (format!("usr/lib/pm-utils/sleep.d/42{name}"), 0o755),
    ]
}

impl Assembler for DebianAssembler {
    fn package_type(&self) -> PackageType {
        PackageType::Deb
    }

    async fn assemble<R: CommandRunner>(&self, ctx: &BuildContext<'_, R>) -> Result<PathBuf> {
        let settings = ctx.settings;
        log::info!("building {} Debian package", settings.binary_name());

        log::info!("removing old build directories");
        fs::remove_dir_all(&settings.staging_dir()).await?;

        let packaged = build(ctx).await;

        log::info!("cleaning up");
        if let Err(e) = ctx.make_clean().await {
            log::warn!("{}", e);
        }

        packaged
    }
}

async fn build<R: CommandRunner>(ctx: &BuildContext<'_, R>) -> Result<PathBuf> {
    let settings = ctx.settings;
    let name = settings.binary_name();
    let staging = settings.staging_dir();

    let arch = Arch::from_dpkg(&single_line(
        &ctx.output(ShellCommand::new("dpkg").arg("--print-architecture"))
            .await
            .context("querying architecture")?,
    ));

    log::info!("compiling for {}", arch);
    ctx.make_clean().await?;
    let mut env = vec![
        ("WITH_LIBUDEV", "yes"),
        ("WITH_LIBUDEV_DLOPEN", "yes"),
        ("WITH_PM_UTILS", "yes"),
    ];
    if let Some(cflags) = arch.cflags() {
        env.push(("CFLAGS", cflags));
    }
    ctx.make(env).await?;

    log::info!("copying build data");
    fs::copy_dir(&settings.build_data("linux"), &staging).await?;

    log::info!("copying {} binary", name);
    let bin_dir = staging.join("usr").join("bin");
    fs::create_dir_all(&bin_dir, false).await?;
    let binary = fs::copy_file(&settings.daemon_binary(), &bin_dir.join(name)).await?;

    log::info!("creating DEBIAN/control from template");
    let version = package_version(&ctx.query_version(&settings.daemon_binary()).await?);
    let installed_size = installed_size(ctx).await?;
    let control = staging.join("DEBIAN").join("control");
    specialize(
        &control,
        &control,
        &replacements([
            ("<<VERSION>>", version.clone()),
            ("<<ARCHITECTURE>>", arch.to_string()),
            ("<<INSTALLED_SIZE>>", installed_size.to_string()),
        ]),
    )
    .await?;

    log::info!("preparing files");
    ctx.run(
        ShellCommand::new("objcopy")
            .args(["--strip-debug", "--strip-unneeded"])
            .arg(&binary),
    )
    .await
    .context("stripping binary")?;

    let doc_dir = staging.join("usr/share/doc").join(name);
    fs::copy_file(&settings.changelog(), &doc_dir.join("changelog")).await?;

    let variant = ConfigVariant::for_version(&version, &settings.linux().red_brick_suffix);
    select_config(&staging.join("etc"), name, variant).await?;

    gzip_best(&doc_dir.join("changelog")).await?;
    gzip_best(&staging.join("usr/share/man/man8").join(format!("{name}.8"))).await?;
    gzip_best(&staging.join("usr/share/man/man5").join(format!("{name}.conf.5"))).await?;

    append_md5sums(&staging).await?;
    normalize_modes(&staging, name).await?;

    let deb_name = artifact_name(name, &version, &arch);
    let deb_path = settings.root().join(&deb_name);
    fs::remove_file_if_exists(&deb_path).await?;

    build_package(ctx, &deb_name).await?;

    log::info!("checking Debian package");
    let mut lintian = ShellCommand::new("lintian");
    if settings.linux().lintian_pedantic {
        lintian = lintian.arg("--pedantic");
    }
    ctx.run(lintian.arg(&deb_name).current_dir(settings.root()))
        .await
        .context("checking Debian package")?;

    Ok(deb_path)
}

/// Installed size in KiB: `du -s` of the staging tree without `DEBIAN`.
async fn installed_size<R: CommandRunner>(ctx: &BuildContext<'_, R>) -> Result<u64> {
    let staging = ctx.settings.staging_dir_relative();
    let output = ctx
        .output(
            ShellCommand::new("du")
                .arg("-s")
                .arg("--exclude")
                .arg(staging.join("DEBIAN"))
                .arg(staging)
                .current_dir(ctx.settings.root()),
        )
        .await
        .context("computing installed size")?;

    parse_du(&output)
}

fn parse_du(output: &str) -> Result<u64> {
    output
        .split_whitespace()
        .next()
        .and_then(|size| size.parse().ok())
        .with_context(|| format!("unexpected du output: {:?}", output.trim()))
}

async fn select_config(etc: &Path, name: &str, variant: ConfigVariant) -> Result<()> {
    let default = etc.join(format!("{name}-default.conf"));
    let red_brick = etc.join(format!("{name}-red-brick.conf"));
    let (keep, discard) = match variant {
        ConfigVariant::Default => (default, red_brick),
        ConfigVariant::RedBrick => (red_brick, default),
    };
    let target = etc.join(format!("{name}.conf"));

    log::debug!("using {} as {}", keep.display(), target.display());
    tokio::fs::rename(&keep, &target)
        .await
        .fs_context("renaming configuration", &keep)?;
    tokio::fs::remove_file(&discard)
        .await
        .fs_context("removing configuration", &discard)
}

/// Compresses `path` to `path.gz` at maximum level and removes the original.
async fn gzip_best(path: &Path) -> Result<PathBuf> {
    let content = tokio::fs::read(path)
        .await
        .fs_context("reading file to compress", path)?;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&content)?;
    let compressed = encoder.finish()?;

    let mut gz_path = OsString::from(path.as_os_str());
    gz_path.push(".gz");
    let gz_path = PathBuf::from(gz_path);

    tokio::fs::write(&gz_path, compressed)
        .await
        .fs_context("writing", &gz_path)?;
    tokio::fs::remove_file(path)
        .await
        .fs_context("removing uncompressed", path)?;

    Ok(gz_path)
}

async fn append_md5sums(staging: &Path) -> Result<()> {
    let lines = md5sum_lines(staging, "usr").await?;
    let md5sums = staging.join("DEBIAN").join("md5sums");

    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&md5sums)
        .await
        .fs_context("opening", &md5sums)?;
    file.write_all(lines.as_bytes())
        .await
        .fs_context("appending to", &md5sums)?;
    file.flush().await.fs_context("flushing", &md5sums)
}

async fn normalize_modes(staging: &Path, name: &str) -> Result<()> {
    fs::set_dir_modes(staging, DIR_MODE).await?;

    for (relative, mode) in file_modes(name) {
        fs::set_mode(&staging.join(relative), mode).await?;
    }

    Ok(())
}

/// Builds the package from a root-owned tree.
///
/// Ownership goes to root only around `dpkg -b` and is handed back even when
/// the package build fails.
async fn build_package<R: CommandRunner>(ctx: &BuildContext<'_, R>, deb_name: &str) -> Result<()> {
    let settings: &Settings = ctx.settings;
    let staging = settings.staging_dir();
    let elevation = Elevation::new(settings.linux().elevation_wrapper.clone());
    let owner = match &settings.linux().owner {
        Some(owner) => owner.clone(),
        None => privilege::invoking_owner()?,
    };

    log::info!("changing owner to root");
    elevation
        .chown_recursive(ctx.runner, &staging, &Owner::root())
        .await?;

    log::info!("building Debian package");
    let built = ctx
        .run(
            ShellCommand::new("dpkg")
                .arg("-b")
                .arg(settings.staging_dir_relative())
                .arg(deb_name)
                .current_dir(settings.root()),
        )
        .await
        .context("building Debian package");

    log::info!("changing owner back to {}", owner.spec());
    let restored = elevation.chown_recursive(ctx.runner, &staging, &owner).await;

    built?;
    restored
}
