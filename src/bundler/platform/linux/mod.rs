//! Linux packaging.

pub mod debian;

pub use debian::DebianAssembler;
