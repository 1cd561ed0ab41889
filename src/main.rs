//! build_pkg - compiles brickd and packages it for the current platform.
//!
//! Produces a .dmg, an NSIS .exe or a .deb in the build root and exits with 0
//! on success, 1 on any failure.

use brickd_bundler::cli;
use std::process;

#[tokio::main]
async fn main() {
    // Progress goes to the log; RUST_LOG overrides the default level
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let exit_code = match cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    };

    process::exit(exit_code);
}
