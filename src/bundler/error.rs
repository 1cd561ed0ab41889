//! Error type shared by every bundling step.
//!
//! Failures are values: each step returns [`Result`] and the caller decides
//! whether to abort. Only `main` turns an error into a process exit code.

use std::{
    fmt::Display,
    io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Result type alias for bundling operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while assembling a package.
#[derive(Error, Debug)]
pub enum Error {
    /// An external program could not be started at all.
    #[error("failed to run `{command}`: {error}")]
    CommandFailed {
        /// Command line that was attempted
        command: String,
        /// Underlying spawn error
        #[source]
        error: io::Error,
    },

    /// An external program ran but exited unsuccessfully.
    #[error("{}", describe_exit(.command, .code, .output))]
    CommandExit {
        /// Command line that failed
        command: String,
        /// Exit code, `None` when terminated by a signal
        code: Option<i32>,
        /// Captured standard output, empty for non-capturing runs
        output: String,
    },

    /// A replacement token never occurred in its template.
    #[error("Not all replacements for {} have been applied (missing: {})", .path.display(), .missing.join(", "))]
    TemplateIncomplete {
        /// Template that was specialized
        path: PathBuf,
        /// Tokens that were not found
        missing: Vec<String>,
    },

    /// The pipeline was started by a privileged account.
    #[error("must not be started as root, exiting")]
    PrivilegedUser,

    /// The host operating system has no assembler.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Filesystem operation failed on a specific path.
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        /// What was being done
        context: String,
        /// Path involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        error: io::Error,
    },

    /// A failure annotated with the step it happened in.
    #[error("{context}: {source}")]
    Context {
        /// Step description
        context: String,
        /// Original failure
        #[source]
        source: Box<Error>,
    },

    /// Plain I/O error without path information.
    #[error("{0}")]
    IoError(#[from] io::Error),

    /// Directory walk failed.
    #[error("{0}")]
    WalkDir(#[from] walkdir::Error),

    /// Path prefix stripping failed.
    #[error("{0}")]
    StripPrefix(#[from] std::path::StripPrefixError),

    /// Anything else.
    #[error("{0}")]
    GenericError(String),
}

fn describe_exit(command: &str, code: &Option<i32>, output: &str) -> String {
    let status = match code {
        Some(code) => format!("exit code {code}"),
        None => "termination by signal".to_string(),
    };
    let output = output.trim();
    if output.is_empty() {
        format!("`{command}` failed with {status}")
    } else {
        format!("`{command}` failed with {status}, output: {output}")
    }
}

/// Attach filesystem context to I/O results.
pub trait ErrorExt<T> {
    /// Wraps an I/O error with an operation description and the path involved.
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, io::Error> {
    fn fs_context(self, context: &str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context: context.to_string(),
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Attach a step description to a failure, or turn `None` into one.
pub trait Context<T> {
    /// Adds a fixed description.
    fn context<C: Display>(self, context: C) -> Result<T>;

    /// Adds a lazily built description.
    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T>;
}

impl<T> Context<T> for Result<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.map_err(|source| Error::Context {
            context: context.to_string(),
            source: Box::new(source),
        })
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.map_err(|source| Error::Context {
            context: f().to_string(),
            source: Box::new(source),
        })
    }
}

impl<T> Context<T> for Option<T> {
    fn context<C: Display>(self, context: C) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }

    fn with_context<C: Display, F: FnOnce() -> C>(self, f: F) -> Result<T> {
        self.ok_or_else(|| Error::GenericError(f().to_string()))
    }
}

impl Error {
    /// Returns the innermost error, skipping step annotations.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::bundler::Error::GenericError(format!($($arg)*)))
    };
}
