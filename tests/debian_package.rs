//! Debian pipeline against a fake toolchain.

#![cfg(unix)]

mod common;

use brickd_bundler::bundler::{
    Assembler, BuildContext, Bundler, Error, Host, PackageType,
    platform::linux::DebianAssembler,
};
use common::{BuildRoot, FakeToolchain};
use std::{ffi::OsStr, os::unix::fs::PermissionsExt, path::Path};

fn mode(path: &Path) -> u32 {
    std::fs::metadata(path).unwrap().permissions().mode() & 0o777
}

fn linux_host() -> Host {
    Host {
        os: "linux".to_string(),
        privileged: false,
    }
}

#[tokio::test]
async fn builds_default_package() {
    let root = BuildRoot::new();
    let runner = FakeToolchain::new(root.path(), "2.3.1");
    let bundler = Bundler::new(root.settings(), runner);

    let artifact = bundler.bundle_for(&linux_host()).await.unwrap();

    assert_eq!(artifact.package_type, PackageType::Deb);
    assert_eq!(artifact.path, root.path().join("brickd-2.3.1_amd64.deb"));
    assert_eq!(artifact.size, std::fs::metadata(&artifact.path).unwrap().len());
    assert_eq!(artifact.checksum.len(), 64);

    let dist = root.path().join("dist");
    assert_eq!(
        std::fs::read_to_string(dist.join("DEBIAN/control")).unwrap(),
        "Package: brickd\nVersion: 2.3.1\nArchitecture: amd64\nInstalled-Size: 1234\n"
    );
    assert_eq!(
        std::fs::read_to_string(dist.join("etc/brickd.conf")).unwrap(),
        "listen.address = 0.0.0.0\n"
    );
    assert!(!dist.join("etc/brickd-default.conf").exists());
    assert!(!dist.join("etc/brickd-red-brick.conf").exists());

    assert!(dist.join("usr/share/doc/brickd/changelog.gz").is_file());
    assert!(!dist.join("usr/share/doc/brickd/changelog").exists());
    assert!(dist.join("usr/share/man/man8/brickd.8.gz").is_file());
    assert!(dist.join("usr/share/man/man5/brickd.conf.5.gz").is_file());

    let md5sums = std::fs::read_to_string(dist.join("DEBIAN/md5sums")).unwrap();
    let listed: Vec<_> = md5sums
        .lines()
        .map(|line| line.split_once("  ").unwrap().1)
        .collect();
    assert!(listed.contains(&"usr/bin/brickd"));
    assert!(listed.contains(&"usr/share/doc/brickd/changelog.gz"));
    assert!(listed.iter().all(|path| path.starts_with("usr/")));

    assert_eq!(mode(&dist.join("usr/share/doc")), 0o755);
    assert_eq!(mode(&dist.join("usr/bin/brickd")), 0o755);
    assert_eq!(mode(&dist.join("DEBIAN/postinst")), 0o755);
    assert_eq!(mode(&dist.join("DEBIAN/md5sums")), 0o644);
    assert_eq!(mode(&dist.join("etc/brickd.conf")), 0o644);
    assert_eq!(mode(&dist.join("usr/lib/pm-utils/sleep.d/42brickd")), 0o755);
}

#[tokio::test]
async fn packaging_commands_run_in_order() {
    let root = BuildRoot::new();
    let settings = root.settings();
    let runner = FakeToolchain::new(root.path(), "2.3.1");
    let ctx = BuildContext::new(&settings, &runner);

    DebianAssembler.assemble(&ctx).await.unwrap();

    let dist = root.path().join("dist");
    let lines = runner.lines();
    let position = |needle: &str| {
        lines
            .iter()
            .position(|line| line == needle)
            .unwrap_or_else(|| panic!("{needle} not run, got {lines:#?}"))
    };

    let to_root = position(&format!("sudo chown -R root:root {}", dist.display()));
    let build = position("dpkg -b dist brickd-2.3.1_amd64.deb");
    let restore = position(&format!("sudo chown -R builder:builder {}", dist.display()));
    let lint = position("lintian --pedantic brickd-2.3.1_amd64.deb");
    assert!(to_root < build && build < restore && restore < lint);

    assert_eq!(lines.first().unwrap(), "dpkg --print-architecture");
    assert_eq!(lines.last().unwrap(), "make clean");
    assert!(lines.contains(&"du -s --exclude dist/DEBIAN dist".to_string()));
    assert!(lines.contains(&format!(
        "objcopy --strip-debug --strip-unneeded {}",
        dist.join("usr/bin/brickd").display()
    )));

    let make = runner
        .find("make")
        .into_iter()
        .find(|c| c.get_args().is_empty())
        .unwrap();
    assert_eq!(make.env_value("CC"), Some(OsStr::new("gcc")));
    assert_eq!(make.env_value("WITH_LIBUDEV"), Some(OsStr::new("yes")));
    assert_eq!(make.env_value("WITH_LIBUDEV_DLOPEN"), Some(OsStr::new("yes")));
    assert_eq!(make.env_value("WITH_PM_UTILS"), Some(OsStr::new("yes")));
    assert_eq!(make.env_value("CFLAGS"), None);
    assert_eq!(make.get_current_dir(), Some(root.path().join("brickd").as_path()));
}

#[tokio::test]
async fn red_brick_build_ships_red_brick_config() {
    let root = BuildRoot::new();
    let settings = root.settings();
    let runner = FakeToolchain::new(root.path(), "2.3.1+redbrick");
    let ctx = BuildContext::new(&settings, &runner);

    let deb = DebianAssembler.assemble(&ctx).await.unwrap();

    assert_eq!(deb, root.path().join("brickd-2.3.1+redbrick_amd64.deb"));
    let etc = root.path().join("dist/etc");
    assert_eq!(
        std::fs::read_to_string(etc.join("brickd.conf")).unwrap(),
        "listen.address = 127.0.0.1\n"
    );
    assert!(!etc.join("brickd-default.conf").exists());
    assert!(!etc.join("brickd-red-brick.conf").exists());
}

#[tokio::test]
async fn i386_adds_march_flag_and_spaces_become_dashes() {
    let root = BuildRoot::new();
    let settings = root.settings();
    let runner = FakeToolchain::new(root.path(), "2.4.0 beta1").with_arch("i386");
    let ctx = BuildContext::new(&settings, &runner);

    let deb = DebianAssembler.assemble(&ctx).await.unwrap();

    assert_eq!(deb, root.path().join("brickd-2.4.0-beta1_i386.deb"));
    let make = runner
        .find("make")
        .into_iter()
        .find(|c| c.get_args().is_empty())
        .unwrap();
    assert_eq!(make.env_value("CFLAGS"), Some(OsStr::new("-march=i386")));
}

#[tokio::test]
async fn existing_package_is_replaced() {
    let root = BuildRoot::new();
    let stale = root.path().join("brickd-2.3.1_amd64.deb");
    std::fs::write(&stale, "stale").unwrap();
    let settings = root.settings();
    let runner = FakeToolchain::new(root.path(), "2.3.1");
    let ctx = BuildContext::new(&settings, &runner);

    DebianAssembler.assemble(&ctx).await.unwrap();

    assert_ne!(std::fs::read(&stale).unwrap(), b"stale");
}

#[tokio::test]
async fn ownership_is_restored_when_dpkg_fails() {
    let root = BuildRoot::new();
    let settings = root.settings();
    let runner = FakeToolchain::new(root.path(), "2.3.1").failing("dpkg", "-b");
    let ctx = BuildContext::new(&settings, &runner);

    let err = DebianAssembler.assemble(&ctx).await.unwrap_err();

    assert!(matches!(err.root_cause(), Error::CommandExit { .. }));
    let lines = runner.lines();
    let dist = root.path().join("dist");
    assert!(lines.contains(&format!("sudo chown -R builder:builder {}", dist.display())));
    assert!(!lines.iter().any(|line| line.starts_with("lintian")));
    assert_eq!(lines.last().unwrap(), "make clean");
    assert!(!root.path().join("brickd-2.3.1_amd64.deb").exists());
}

#[tokio::test]
async fn missing_control_token_fails_before_packaging() {
    let root = BuildRoot::new();
    std::fs::write(
        root.path().join("build_data/linux/DEBIAN/control"),
        "Package: brickd\nVersion: <<VERSION>>\n",
    )
    .unwrap();
    let settings = root.settings();
    let runner = FakeToolchain::new(root.path(), "2.3.1");
    let ctx = BuildContext::new(&settings, &runner);

    let err = DebianAssembler.assemble(&ctx).await.unwrap_err();

    match err.root_cause() {
        Error::TemplateIncomplete { missing, .. } => {
            assert_eq!(missing, &["<<ARCHITECTURE>>", "<<INSTALLED_SIZE>>"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(runner.find("dpkg").iter().all(|c| c.get_args()[0] != "-b"));
    assert_eq!(
        std::fs::read_to_string(root.path().join("dist/DEBIAN/control")).unwrap(),
        "Package: brickd\nVersion: <<VERSION>>\n"
    );
}

#[tokio::test]
async fn lintian_failure_fails_the_build() {
    let root = BuildRoot::new();
    let settings = root.settings();
    let runner = FakeToolchain::new(root.path(), "2.3.1").failing("lintian", "--pedantic");
    let ctx = BuildContext::new(&settings, &runner);

    let err = DebianAssembler.assemble(&ctx).await.unwrap_err();

    assert!(err.to_string().starts_with("checking Debian package: "));
    assert!(matches!(err.root_cause(), Error::CommandExit { .. }));
    assert_eq!(runner.lines().last().unwrap(), "make clean");
}

#[tokio::test]
async fn failing_final_clean_does_not_mask_success() {
    let root = BuildRoot::new();
    let settings = root.settings();
    let runner = FakeToolchain::new(root.path(), "2.3.1").failing_nth("make", "clean", 2);
    let ctx = BuildContext::new(&settings, &runner);

    let deb = DebianAssembler.assemble(&ctx).await.unwrap();

    assert_eq!(deb, root.path().join("brickd-2.3.1_amd64.deb"));
    assert!(deb.is_file());
    assert_eq!(
        runner
            .lines()
            .iter()
            .filter(|line| line.as_str() == "make clean")
            .count(),
        2
    );
}

#[tokio::test]
async fn failing_final_clean_keeps_the_original_error() {
    let root = BuildRoot::new();
    let settings = root.settings();
    let runner = FakeToolchain::new(root.path(), "2.3.1").failing("make", "clean");
    let ctx = BuildContext::new(&settings, &runner);

    let err = DebianAssembler.assemble(&ctx).await.unwrap_err();

    // the first clean aborts the build; the tidy-up failure is only logged
    assert!(err.to_string().starts_with("cleaning build tree: "));
    assert!(runner.find("dpkg").iter().all(|c| c.get_args()[0] != "-b"));
}
