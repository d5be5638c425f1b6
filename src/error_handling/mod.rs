//! Error types.
//!
//! The evaluation engine itself never returns errors to its callers: probe and
//! lookup failures are folded into warnings or absent fields. Typed errors exist
//! at the edges:
//! - **Initialization**: logger and HTTP client setup
//! - **Probe**: transport failures of the validation probe, folded into warnings
//! - **Source**: registration and archive upstream failures, mapped to absence
//!   by the history resolver
//! - **Cache**: backend failures, logged and treated as misses

mod types;

// Re-export public API
pub use types::{CacheError, InitializationError, ProbeError, SourceError};
