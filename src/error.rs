//! Error types for oracle request operations.

use thiserror::Error;

use crate::codec::CodecError;
use crate::resilience::poller::Phase;

/// Errors that can occur while talking to the ledger.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Oracle script id unknown to the ledger.
    #[error("No oracle script found with ID {0}")]
    NotFound(u64),

    /// Network, DNS or per-call timeout failure on a single HTTP call.
    #[error("Transport error: {0}")]
    Transport(String),

    /// REST endpoint answered with an unexpected status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Broadcast endpoint refused the envelope at the HTTP level.
    #[error("Broadcast failed ({status}): {message}")]
    Broadcast { status: u16, message: String },

    /// Ledger accepted the envelope for processing but rejected the transaction.
    #[error("Transaction rejected with code {code}: {raw_log}")]
    RejectedTransaction { code: u32, raw_log: String },

    /// Response body did not have the expected shape.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Codec failed on parameters or result bytes.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Key derivation or signing failed.
    #[error("Signing error: {0}")]
    Signing(String),

    /// Poll deadline or attempt budget exhausted.
    #[error("Timed out waiting for {phase} after {attempts} attempts ({elapsed_ms} ms)")]
    Timeout {
        phase: Phase,
        attempts: u32,
        elapsed_ms: u64,
    },

    /// Poll abandoned by its caller.
    #[error("Cancelled while waiting for {phase}")]
    Cancelled { phase: Phase },

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for OracleError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for OracleError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<base64::DecodeError> for OracleError {
    fn from(err: base64::DecodeError) -> Self {
        Self::Decode(format!("invalid base64: {}", err))
    }
}

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OracleError::NotFound(42);
        assert_eq!(err.to_string(), "No oracle script found with ID 42");

        let err = OracleError::Timeout {
            phase: Phase::Proof,
            attempts: 5,
            elapsed_ms: 500,
        };
        assert_eq!(err.to_string(), "Timed out waiting for proof after 5 attempts (500 ms)");

        let err = OracleError::RejectedTransaction {
            code: 4,
            raw_log: "signature verification failed".into(),
        };
        assert!(err.to_string().contains("code 4"));
    }

    #[test]
    fn test_codec_error_is_transparent() {
        let err: OracleError = CodecError::Encode("missing field value".into()).into();
        assert_eq!(err.to_string(), "Encode error: missing field value");
    }
}
