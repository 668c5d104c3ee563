//! Oracle script binary interface.
//!
//! # Data Flow
//! ```text
//! params (JSON) + schema
//!     → Codec::encode_input (calldata bytes, broadcast in the request message)
//!
//! result bytes + schema
//!     → Codec::decode_output (DecodedValue tree)
//!     → canonical.rs (deterministic string per output field)
//! ```
//!
//! The binary format itself is owned by the [`Codec`] implementation handed
//! to the client. This module only fixes the contract and the value model.

pub mod canonical;

use alloy::primitives::{I256, U256};
use thiserror::Error;

pub use canonical::stringify;

/// Errors raised by a [`Codec`] implementation.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Parameters do not fit the input schema.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Bytes do not match the output schema.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// A value produced by decoding oracle script output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    /// Ordered sequence.
    Array(Vec<DecodedValue>),
    /// Unsigned integer of up to 256 bits.
    Uint(U256),
    /// Signed integer of up to 256 bits.
    Int(I256),
    /// Raw byte buffer.
    Bytes(Vec<u8>),
    /// Keyed mapping, entries kept in declaration order.
    Map(Vec<(String, DecodedValue)>),
    /// Any JSON scalar (string, boolean, number, null).
    Scalar(serde_json::Value),
}

impl DecodedValue {
    /// Build a mapping from `(name, value)` pairs.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, DecodedValue)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<u64> for DecodedValue {
    fn from(value: u64) -> Self {
        Self::Uint(U256::from(value))
    }
}

impl From<i64> for DecodedValue {
    fn from(value: i64) -> Self {
        Self::Int(I256::try_from(value).unwrap_or_default())
    }
}

impl From<Vec<u8>> for DecodedValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&str> for DecodedValue {
    fn from(value: &str) -> Self {
        Self::Scalar(serde_json::Value::String(value.to_string()))
    }
}

/// Encoder/decoder for an oracle script's schema.
///
/// Implementations must be pure: the same schema and input always produce
/// the same output.
pub trait Codec: Send + Sync {
    /// Encode call parameters into calldata bytes.
    fn encode_input(&self, schema: &str, params: &serde_json::Value) -> Result<Vec<u8>, CodecError>;

    /// Decode result bytes into a value tree. The top level is expected to be
    /// a [`DecodedValue::Map`] whose entries follow the schema's field order.
    fn decode_output(&self, schema: &str, bytes: &[u8]) -> Result<DecodedValue, CodecError>;
}
