//! Evaluation log and Markdown report rendering.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::REPORT_RECENT_ENTRIES;
use crate::models::ValidationOutcome;

/// Bounded, append-only record of returned outcomes.
///
/// Once `capacity` is reached the oldest entry is dropped for each new one.
pub struct EvaluationLog {
    entries: Mutex<VecDeque<ValidationOutcome>>,
    capacity: usize,
}

impl EvaluationLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, VecDeque<ValidationOutcome>> {
        // A panic while holding the lock cannot leave the deque half-updated
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record(&self, outcome: &ValidationOutcome) {
        let mut entries = self.entries();
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(outcome.clone());
    }

    pub fn record_all<'a>(&self, outcomes: impl IntoIterator<Item = &'a ValidationOutcome>) {
        for outcome in outcomes {
            self.record(outcome);
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Copy of the retained entries, oldest first.
    pub fn snapshot(&self) -> Vec<ValidationOutcome> {
        self.entries().iter().cloned().collect()
    }

    /// Renders the Markdown report: summary over retained entries plus the
    /// most recent `REPORT_RECENT_ENTRIES` results.
    pub fn render_report(&self, now: DateTime<Utc>) -> String {
        render_report(&self.snapshot(), now)
    }
}

fn render_report(entries: &[ValidationOutcome], now: DateTime<Utc>) -> String {
    if entries.is_empty() {
        return "No URLs have been validated yet.".to_string();
    }

    let valid_count = entries.iter().filter(|entry| entry.is_valid).count();
    let invalid_count = entries.len() - valid_count;
    let average_score =
        entries.iter().map(|entry| entry.reputation_score).sum::<f64>() / entries.len() as f64;

    let mut report = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(report, "# URL Validation Report\n");
    let _ = writeln!(
        report,
        "Generated: {}",
        now.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(report, "Total URLs validated: {}\n", entries.len());

    let _ = writeln!(report, "## Summary");
    let _ = writeln!(report, "- Valid URLs: {valid_count}");
    let _ = writeln!(report, "- Invalid URLs: {invalid_count}");
    let _ = writeln!(report, "- Average reputation score: {average_score:.1}/100\n");

    let _ = writeln!(report, "## Detailed Results\n");
    let recent_start = entries.len().saturating_sub(REPORT_RECENT_ENTRIES);
    for entry in &entries[recent_start..] {
        let mark = if entry.is_valid { "✓" } else { "✗" };
        let _ = writeln!(report, "{mark} **{}**", entry.url);
        let _ = writeln!(report, "  - Status: {}", entry.status_code);
        let _ = writeln!(report, "  - Reputation: {:.1}/100", entry.reputation_score);
        if !entry.warnings.is_empty() {
            let _ = writeln!(report, "  - Warnings: {}", entry.warnings.join(", "));
        }
        if let Some(error) = &entry.error {
            let _ = writeln!(report, "  - Error: {error}");
        }
        report.push('\n');
    }

    report
}
