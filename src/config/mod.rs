//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, limits, upstream endpoints, cache TTLs)
//! - The library `Config` struct and logging option enums

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
