//! Infrastructure - configuration, business hours and run metrics
//!
//! This module contains infrastructure concerns:
//! - `config` - Application configuration (TOML loading, env overrides, defaults)
//! - `hours` - Local business-hours gate
//! - `metrics` - Per-run counters and summary logging

pub mod config;
pub mod hours;
pub mod metrics;

// Re-export commonly used types
pub use config::Config;
pub use hours::BusinessHours;
pub use metrics::RunSummary;
