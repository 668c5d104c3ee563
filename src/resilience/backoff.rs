//! Delay between poll attempts.

use std::time::Duration;

use rand::Rng;

use crate::config::PollConfig;

/// Calculate exponential backoff delay with jitter.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    // Apply jitter (0 to 10% of the delay)
    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}

/// Delay after the `attempt`-th failed attempt (1-based).
///
/// Fixed at `interval_ms` unless `max_interval_ms` is larger, in which case
/// the delay doubles per attempt up to that cap.
pub fn poll_delay(policy: &PollConfig, attempt: u32) -> Duration {
    if policy.max_interval_ms <= policy.interval_ms {
        return policy.interval();
    }
    calculate_backoff(attempt.max(1), policy.interval_ms, policy.max_interval_ms)
}
