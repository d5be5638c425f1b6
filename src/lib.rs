//! url_reputation library: trust scoring for URLs
//!
//! Evaluates URLs that may have been invented (for example by a language model)
//! and scores how trustworthy each one is. An evaluation combines:
//! - a live HTTP probe with content and URL-pattern heuristics
//! - domain registration age (RDAP)
//! - archive presence (Wayback Machine CDX index)
//!
//! into a 0-100 reputation score and a confidence level. Results are cached
//! (Redis or in-process) with TTLs that depend on validity.
//!
//! # Example
//!
//! ```no_run
//! use url_reputation::{Config, Evaluator};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let evaluator = Evaluator::from_config(&Config::default()).await?;
//! let outcomes = evaluator
//!     .evaluate_batch(&["https://www.rust-lang.org/".to_string()])
//!     .await;
//! println!("score: {}", outcomes[0].reputation_score);
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod cache;
pub mod config;
mod domain;
mod error_handling;
pub mod evaluate;
pub mod extract;
pub mod history;
pub mod initialization;
pub mod models;
pub mod patterns;
pub mod report;
pub mod scoring;
pub mod server;
pub mod validator;

// Re-export public API
pub use cache::{CacheStats, ReputationCache};
pub use config::{Config, LogFormat, LogLevel};
pub use domain::{extract_domain, registrable_domain};
pub use error_handling::{CacheError, InitializationError, ProbeError, SourceError};
pub use evaluate::Evaluator;
pub use extract::{extract_domains, extract_links, ContentHint};
pub use history::DomainHistoryResolver;
pub use models::{
    ConfidenceLevel, DomainHistory, LinkCheckReport, LinkCheckSummary, ValidationDepth,
    ValidationOutcome,
};
pub use report::EvaluationLog;
pub use validator::UrlValidator;
