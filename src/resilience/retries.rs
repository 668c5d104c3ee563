//! Failure classification for poll attempts.
//!
//! Connection errors, 404 (not indexed yet), 408, 425, 429 and 5xx are
//! transient. Any other 4xx means the request itself is wrong and will
//! never succeed, so the poll aborts.

/// How a failed attempt should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Try again after the poll interval.
    Transient,
    /// Abort the poll and surface the error.
    Fatal,
}

/// Classify a non-success HTTP status.
pub fn classify_status(status: u16) -> FailureClass {
    match status {
        404 | 408 | 425 | 429 => FailureClass::Transient,
        400..=499 => FailureClass::Fatal,
        _ => FailureClass::Transient,
    }
}
