//! Metrics collection.
//!
//! # Metrics
//! - `oracle_poll_attempts_total` (counter): attempts by phase, outcome
//! - `oracle_poll_duration_seconds` (histogram): whole-poll latency by phase
//! - `oracle_broadcasts_total` (counter): broadcasts by outcome
//!
//! Recorded through the `metrics` facade; a no-op until the embedding
//! application installs a recorder.

use std::time::Duration;

use crate::resilience::poller::Phase;

/// Record one poll attempt.
pub fn record_poll_attempt(phase: Phase, outcome: &'static str) {
    metrics::counter!(
        "oracle_poll_attempts_total",
        "phase" => phase.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record the total duration of a finished poll.
pub fn record_poll_duration(phase: Phase, elapsed: Duration) {
    metrics::histogram!("oracle_poll_duration_seconds", "phase" => phase.as_str())
        .record(elapsed.as_secs_f64());
}

/// Record a broadcast outcome.
pub fn record_broadcast(outcome: &'static str) {
    metrics::counter!("oracle_broadcasts_total", "outcome" => outcome).increment(1);
}
