//! HTTP handlers.

mod evaluate;
mod info;

pub use evaluate::{extract_handler, reputation_handler, validate_handler};
pub use info::{cache_stats_handler, domain_history_handler, report_handler};
