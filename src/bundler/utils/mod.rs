//! Shared helpers for the platform assemblers.

pub mod fs;
