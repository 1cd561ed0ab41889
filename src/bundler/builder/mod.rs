//! Platform dispatch and artifact reporting.
//!
//! The [`Bundler`] checks the host, selects exactly one platform assembler,
//! runs it and reports the finished artifact as a [`BundledArtifact`].
//!
//! # Example
//!
//! ```no_run
//! use brickd_bundler::bundler::{Bundler, Host, SettingsBuilder, SystemRunner};
//!
//! # async fn example() -> brickd_bundler::bundler::Result<()> {
//! let settings = SettingsBuilder::new().root("/src/brickd").build()?;
//! let bundler = Bundler::new(settings, SystemRunner);
//!
//! let artifact = bundler.bundle_for(&Host::current()).await?;
//! println!("Created: {} ({} bytes)", artifact.path.display(), artifact.size);
//! println!("SHA256: {}", artifact.checksum);
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`checksum`] - SHA256 of artifacts, md5sums for Debian packages
//! - [`orchestrator`] - [`Bundler`], [`Host`] and dispatch
//! - [`tool_detection`] - signing script and makensis lookup

pub mod checksum;
pub mod orchestrator;
pub mod tool_detection;

pub use orchestrator::{BundledArtifact, Bundler, Host};
