//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! blockchain/, resilience/, oracle/ produce:
//!     → logging.rs (structured tracing events, per-submission spans)
//!     → metrics.rs (counters, histograms via the `metrics` facade)
//!
//! Consumers:
//!     → whatever subscriber / recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - The library never installs a metrics exporter
//! - Secrets (seed phrases, keys) never reach either channel

pub mod logging;
pub mod metrics;
