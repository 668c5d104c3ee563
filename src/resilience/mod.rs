//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Lifecycle phase (request id / proof / result / matching result):
//!     → poller.rs (sequential GET attempts until the fact is present)
//!     → On failure: retries.rs (transient → try again, fatal → abort)
//!     → Between attempts: backoff.rs (fixed or capped exponential delay)
//!     → Deadline / attempt budget / CancelToken end the poll
//! ```
//!
//! # Design Decisions
//! - Every poll is bounded; nothing waits forever by default
//! - Only idempotent GETs are retried, never the broadcast POST
//! - Waiting is cooperative (tokio timers), never a blocked thread

pub mod backoff;
pub mod poller;
pub mod retries;

pub use poller::{Attempt, LifecyclePoller, Phase};
