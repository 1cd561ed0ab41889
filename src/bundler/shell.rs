//! External command execution.
//!
//! Every tool the pipeline depends on (make, codesign, hdiutil, makensis,
//! dpkg, lintian, ...) is invoked through a [`CommandRunner`]. The production
//! [`SystemRunner`] spawns real processes; tests substitute a recorder.

use crate::bundler::error::{Error, Result};
use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::{Path, PathBuf},
    process::Stdio,
};

/// A fully described external command: program, arguments, environment
/// overrides and working directory.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShellCommand {
    program: OsString,
    args: Vec<OsString>,
    envs: Vec<(OsString, OsString)>,
    current_dir: Option<PathBuf>,
}

impl ShellCommand {
    /// Creates a command for `program` with no arguments.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            ..Default::default()
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Adds an environment override on top of the inherited environment.
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    /// Adds several environment overrides.
    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<OsStr>,
        V: AsRef<OsStr>,
    {
        for (key, value) in vars {
            self = self.env(key, value);
        }
        self
    }

    /// Runs the command in `dir` instead of the ambient working directory.
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    pub fn get_envs(&self) -> &[(OsString, OsString)] {
        &self.envs
    }

    pub fn get_current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }

    /// Looks up an environment override by name.
    pub fn env_value(&self, key: &str) -> Option<&OsStr> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    fn to_tokio(&self) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&self.program);
        command.args(&self.args);
        command.envs(self.envs.iter().map(|(k, v)| (k, v)));
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.envs {
            write!(f, "{}={} ", key.to_string_lossy(), value.to_string_lossy())?;
        }
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            let arg = arg.to_string_lossy();
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// Executes external commands on behalf of the assemblers.
///
/// Both operations block (from the pipeline's point of view) until the
/// process has exited. A non-zero exit is always an [`Error::CommandExit`].
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Runs a command with inherited stdio.
    async fn run(&self, command: &ShellCommand) -> Result<()>;

    /// Runs a command and returns its captured standard output.
    ///
    /// On failure the error carries the captured output for diagnostics.
    async fn output(&self, command: &ShellCommand) -> Result<String>;
}

/// [`CommandRunner`] that spawns real processes with `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, command: &ShellCommand) -> Result<()> {
        log::debug!("running: {}", command);

        let status = command
            .to_tokio()
            .status()
            .await
            .map_err(|error| Error::CommandFailed {
                command: command.to_string(),
                error,
            })?;

        if !status.success() {
            return Err(Error::CommandExit {
                command: command.to_string(),
                code: status.code(),
                output: String::new(),
            });
        }

        Ok(())
    }

    async fn output(&self, command: &ShellCommand) -> Result<String> {
        log::debug!("capturing: {}", command);

        let output = command
            .to_tokio()
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .await
            .map_err(|error| Error::CommandFailed {
                command: command.to_string(),
                error,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            return Err(Error::CommandExit {
                command: command.to_string(),
                code: output.status.code(),
                output: stdout,
            });
        }

        Ok(stdout)
    }
}

/// Strips every line terminator from single-line tool output.
pub fn single_line(output: &str) -> String {
    output.replace("\r\n", "").replace('\n', "")
}
