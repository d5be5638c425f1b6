//! Reputation scoring.
//!
//! A score in `[0, 100]` built from four capped components:
//!
//! | Component   | Range | Signal                                   |
//! |-------------|-------|------------------------------------------|
//! | age         | 0-30  | days since domain registration           |
//! | archive     | 0-20  | number of archived captures              |
//! | technical   | 0-25  | TLS, response time, HTTP 200             |
//! | consistency | 0-25  | number of validation warnings            |

use crate::models::{DomainHistory, ValidationOutcome};

pub const MAX_SCORE: f64 = 100.0;

/// Scores a URL from its domain history and validation outcome.
pub fn score(history: &DomainHistory, outcome: &ValidationOutcome) -> f64 {
    let total = age_points(history.age_days)
        + archive_points(history.wayback_total_snapshots)
        + technical_points(outcome)
        + consistency_points(outcome.warnings.len());
    total.min(MAX_SCORE)
}

/// Any known age earns something, even a zero-day (or clock-skewed) registration.
pub fn age_points(age_days: Option<i64>) -> f64 {
    match age_days {
        None => 0.0,
        Some(days) if days >= 365 * 5 => 30.0,
        Some(days) if days >= 365 * 2 => 20.0,
        Some(days) if days >= 365 => 15.0,
        Some(days) if days >= 180 => 10.0,
        Some(days) if days >= 90 => 5.0,
        Some(_) => 2.0,
    }
}

pub fn archive_points(snapshots: u64) -> f64 {
    match snapshots {
        0 => 0.0,
        1..=4 => 2.0,
        5..=19 => 5.0,
        20..=49 => 10.0,
        50..=99 => 15.0,
        _ => 20.0,
    }
}

pub fn technical_points(outcome: &ValidationOutcome) -> f64 {
    let mut points = 0.0;
    if outcome.ssl_valid {
        points += 10.0;
    }
    if outcome.response_time < 1.0 {
        points += 10.0;
    } else if outcome.response_time < 2.0 {
        points += 5.0;
    }
    if outcome.status_code == 200 {
        points += 5.0;
    }
    points
}

pub fn consistency_points(warning_count: usize) -> f64 {
    match warning_count {
        0 => 25.0,
        1 => 15.0,
        2 => 10.0,
        3 => 5.0,
        _ => 0.0,
    }
}
