//! Queue notifier library
//!
//! Exposes modules for integration testing and binary reuse.

pub mod domain;
pub mod infra;
pub mod io;
pub mod services;

/// Source revision stamped by the build script
pub const GIT_HASH: &str = env!("GIT_HASH");
