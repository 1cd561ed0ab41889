//! Shared fixtures: a fake toolchain and a brickd-shaped build root.

#![allow(dead_code)]

use brickd_bundler::bundler::{
    CommandRunner, DebianSettings, Error, MacOsSettings, Owner, Result, Settings,
    SettingsBuilder, ShellCommand, WindowsSettings,
};
use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tempfile::TempDir;

/// Records every command and simulates the side effects packaging relies on.
pub struct FakeToolchain {
    root: PathBuf,
    version: String,
    arch: String,
    failing: Option<(String, String, Option<usize>)>,
    commands: Mutex<Vec<ShellCommand>>,
}

impl FakeToolchain {
    pub fn new(root: &Path, version: &str) -> Self {
        Self {
            root: root.to_path_buf(),
            version: version.to_string(),
            arch: "amd64".to_string(),
            failing: None,
            commands: Mutex::new(Vec::new()),
        }
    }

    pub fn with_arch(mut self, arch: &str) -> Self {
        self.arch = arch.to_string();
        self
    }

    /// Makes every `program first_arg ...` exit with code 1.
    pub fn failing(mut self, program: &str, first_arg: &str) -> Self {
        self.failing = Some((program.to_string(), first_arg.to_string(), None));
        self
    }

    /// Makes only the `nth` (1-based) `program first_arg ...` exit with code 1.
    pub fn failing_nth(mut self, program: &str, first_arg: &str, nth: usize) -> Self {
        self.failing = Some((program.to_string(), first_arg.to_string(), Some(nth)));
        self
    }

    pub fn commands(&self) -> Vec<ShellCommand> {
        self.commands.lock().unwrap().clone()
    }

    /// Command lines as displayed, for order and argument assertions.
    pub fn lines(&self) -> Vec<String> {
        self.commands().iter().map(|c| c.to_string()).collect()
    }

    pub fn find(&self, program: &str) -> Vec<ShellCommand> {
        self.commands()
            .into_iter()
            .filter(|c| file_name(c.program()) == program)
            .collect()
    }

    fn record(&self, command: &ShellCommand) -> Result<()> {
        let mut commands = self.commands.lock().unwrap();
        commands.push(command.clone());

        if let Some((program, first_arg, nth)) = &self.failing {
            let matches = |c: &ShellCommand| {
                let first = c.get_args().first().map(|a| a.to_string_lossy());
                file_name(c.program()) == *program && first.as_deref() == Some(first_arg.as_str())
            };
            let seen = commands.iter().filter(|c| matches(*c)).count();
            if matches(command) && nth.is_none_or(|nth| nth == seen) {
                return Err(Error::CommandExit {
                    command: command.to_string(),
                    code: Some(1),
                    output: String::new(),
                });
            }
        }

        Ok(())
    }

    fn simulate(&self, command: &ShellCommand) {
        let args: Vec<String> = command
            .get_args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        let cwd = command
            .get_current_dir()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        match file_name(command.program()).as_str() {
            "make" if args.is_empty() => {
                std::fs::write(cwd.join("brickd"), b"\x7fELF brickd").unwrap();
            }
            "compile.bat" => {
                let dist = self.root.join("dist");
                std::fs::create_dir_all(&dist).unwrap();
                std::fs::write(dist.join("brickd.exe"), b"MZ brickd").unwrap();
            }
            "dpkg" if args.first().map(String::as_str) == Some("-b") => {
                std::fs::write(cwd.join(&args[2]), b"!<arch>\ndebian-binary").unwrap();
            }
            "hdiutil" => {
                let image = args.last().unwrap();
                std::fs::write(cwd.join(image), b"koly").unwrap();
            }
            "makensis" | "makensis.exe" => {
                let script = Path::new(&args[0]);
                let installer = format!("brickd_windows_{}.exe", self.version.replace('.', "_"));
                std::fs::write(script.parent().unwrap().join(installer), b"MZ installer").unwrap();
            }
            _ => {}
        }
    }
}

impl CommandRunner for FakeToolchain {
    async fn run(&self, command: &ShellCommand) -> Result<()> {
        self.record(command)?;
        self.simulate(command);
        Ok(())
    }

    async fn output(&self, command: &ShellCommand) -> Result<String> {
        self.record(command)?;
        let first_arg = command
            .get_args()
            .first()
            .map(|a| a.to_string_lossy().into_owned());

        let stdout = match file_name(command.program()).as_str() {
            "dpkg" => format!("{}\n", self.arch),
            "du" => "1234\tdist\n".to_string(),
            "brickd" | "brickd.exe" if first_arg.as_deref() == Some("--version") => {
                format!("{}\r\n", self.version)
            }
            other => panic!("unexpected captured command: {other}"),
        };

        Ok(stdout)
    }
}

fn file_name(program: &OsStr) -> String {
    Path::new(program)
        .file_name()
        .unwrap_or(program)
        .to_string_lossy()
        .into_owned()
}

fn write(path: PathBuf, content: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// A build root with the brickd source directory and all three skeletons.
pub struct BuildRoot {
    pub dir: TempDir,
}

impl BuildRoot {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        std::fs::create_dir_all(root.join("brickd")).unwrap();
        write(root.join("changelog"), "2.3.1: initial\n");

        let linux = root.join("build_data/linux");
        write(
            linux.join("DEBIAN/control"),
            "Package: brickd\nVersion: <<VERSION>>\nArchitecture: <<ARCHITECTURE>>\nInstalled-Size: <<INSTALLED_SIZE>>\n",
        );
        write(linux.join("DEBIAN/conffiles"), "/etc/brickd.conf\n");
        for script in ["preinst", "postinst", "prerm", "postrm"] {
            write(linux.join("DEBIAN").join(script), "#!/bin/sh\n");
        }
        write(linux.join("etc/brickd-default.conf"), "listen.address = 0.0.0.0\n");
        write(linux.join("etc/brickd-red-brick.conf"), "listen.address = 127.0.0.1\n");
        write(linux.join("etc/init.d/brickd"), "#!/bin/sh\n");
        write(linux.join("etc/logrotate.d/brickd"), "/var/log/brickd.log {}\n");
        write(linux.join("usr/share/doc/brickd/copyright"), "GPL-2.0+\n");
        write(linux.join("usr/share/man/man8/brickd.8"), ".TH BRICKD 8\n");
        write(linux.join("usr/share/man/man5/brickd.conf.5"), ".TH BRICKD.CONF 5\n");
        write(linux.join("usr/lib/pm-utils/sleep.d/42brickd"), "#!/bin/sh\n");

        let macosx = root.join("build_data/macosx");
        write(macosx.join("installer/INSTALL.app/Contents/Info.plist"), "<plist/>\n");
        write(
            macosx.join("installer/data/brickd.app/Contents/Info.plist"),
            "<key>CFBundleVersion</key>\n<string><<VERSION>></string>\n",
        );
        write(macosx.join("libusb/libusb-1.0.dylib"), "dylib");
        write(root.join("codesign_identity"), "Developer ID Application: Tinkerforge\n");

        let windows = root.join("build_data/windows");
        write(
            windows.join("nsis/brickd_installer.nsi.template"),
            "!define BRICKD_VERSION \"<<BRICKD_DOT_VERSION>>\"\r\nOutFile \"brickd_windows_<<BRICKD_UNDERSCORE_VERSION>>.exe\"\r\n",
        );
        write(windows.join("drivers/brick.inf"), "[Version]\r\n");
        write(windows.join("readme.txt"), "Brick Daemon\r\n");
        write(windows.join("brickd.ini"), "[General]\r\n");
        write(windows.join("logviewer/logviewer.exe"), "MZ logviewer");
        write(root.join("tools/sign.bat"), "@echo off\r\n");
        write(root.join("tools/makensis.exe"), "MZ makensis");

        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Settings pointing every host-specific path into the build root.
    pub fn settings(&self) -> Settings {
        SettingsBuilder::new()
            .root(self.path())
            .macos_settings(MacOsSettings::default())
            .windows_settings(WindowsSettings {
                sign_script: self.path().join("tools/sign.bat"),
                makensis: self.path().join("tools/makensis.exe"),
                ..Default::default()
            })
            .linux_settings(DebianSettings {
                owner: Some(Owner::new("builder", "builder")),
                ..Default::default()
            })
            .build()
            .unwrap()
    }
}
