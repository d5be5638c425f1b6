//! Evaluation orchestration.
//!
//! Ties the validator, history resolver, scorer and cache together. Every
//! requested URL yields exactly one well-formed [`ValidationOutcome`]; nothing
//! here returns an error to the caller.

use futures::stream::{self, StreamExt};

use crate::cache::ReputationCache;
use crate::config::Config;
use crate::error_handling::InitializationError;
use crate::history::DomainHistoryResolver;
use crate::initialization::{init_client, init_lookup_client};
use crate::models::{DomainHistory, ValidationDepth, ValidationOutcome};
use crate::scoring;
use crate::validator::UrlValidator;

/// Evaluates URLs end to end. Cheap to clone; clones share the cache and clients.
#[derive(Clone)]
pub struct Evaluator {
    validator: UrlValidator,
    resolver: DomainHistoryResolver,
    cache: ReputationCache,
    max_concurrency: usize,
}

impl Evaluator {
    pub fn new(
        validator: UrlValidator,
        resolver: DomainHistoryResolver,
        cache: ReputationCache,
        max_concurrency: usize,
    ) -> Self {
        Self {
            validator,
            resolver,
            cache,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Builds the clients, sources and cache described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built. An unreachable cache
    /// server is not an error; the evaluator runs uncached.
    pub async fn from_config(config: &Config) -> Result<Self, InitializationError> {
        let probe_client = init_client(config)?;
        let lookup_client = init_lookup_client(config)?;
        let validator = UrlValidator::new(probe_client, config.timeout());
        let resolver = DomainHistoryResolver::from_config(lookup_client, config);
        let cache = ReputationCache::connect(config).await;
        Ok(Self::new(validator, resolver, cache, config.max_concurrency))
    }

    pub fn cache(&self) -> &ReputationCache {
        &self.cache
    }

    /// Full evaluation of one URL: cached outcome, or a comprehensive probe
    /// plus domain history and a reputation score.
    ///
    /// Cached outcomes are returned verbatim. A panic during evaluation yields
    /// a degraded outcome carrying the failure in `error`.
    pub async fn evaluate(&self, url: &str) -> ValidationOutcome {
        if let Some(cached) = self.cache.get_validation(url).await {
            log::debug!("Serving cached evaluation for {url}");
            return cached;
        }

        let evaluator = self.clone();
        let owned_url = url.to_string();
        let task = tokio::spawn(async move { evaluator.evaluate_uncached(&owned_url).await });

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("Evaluation of {url} aborted: {e}");
                ValidationOutcome::degraded(url, format!("Evaluation failed: {e}"))
            }
        }
    }

    async fn evaluate_uncached(&self, url: &str) -> ValidationOutcome {
        let (outcome, history) = tokio::join!(
            self.validator.validate(url, ValidationDepth::Comprehensive),
            self.resolver.resolve(url),
        );

        let score = scoring::score(&history, &outcome);
        let outcome = outcome.with_reputation(&history, score);
        log::info!(
            "Evaluated {url}: valid={} score={:.1} confidence={}",
            outcome.is_valid,
            outcome.reputation_score,
            outcome.confidence_level
        );

        self.cache.set_validation(&outcome).await;
        outcome
    }

    /// Evaluates URLs with at most `max_concurrency` in flight, in input order.
    pub async fn evaluate_batch(&self, urls: &[String]) -> Vec<ValidationOutcome> {
        log::debug!(
            "Evaluating batch of {} URL(s), concurrency {}",
            urls.len(),
            self.max_concurrency
        );
        stream::iter(urls.iter().cloned())
            .map(|url| {
                let evaluator = self.clone();
                async move { evaluator.evaluate(&url).await }
            })
            .buffered(self.max_concurrency)
            .collect()
            .await
    }

    /// Domain history for a URL or bare domain, through the history cache.
    pub async fn domain_history(&self, domain: &str) -> DomainHistory {
        if let Some(cached) = self.cache.get_history(domain).await {
            return cached;
        }
        let history = self.resolver.resolve(domain).await;
        self.cache.set_history(domain, &history).await;
        history
    }

    /// Single probe at STANDARD depth, no history and no caching.
    pub async fn validate(&self, url: &str) -> ValidationOutcome {
        self.validator.validate(url, ValidationDepth::Standard).await
    }
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
