//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the client.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the oracle client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Ledger chain identifier, included in every signed message.
    pub chain_id: String,

    /// REST endpoint base URL (e.g., "http://localhost:1317").
    pub endpoint: String,

    /// Timeout for a single HTTP call in seconds.
    pub http_timeout_secs: u64,

    /// Fee attached to every request transaction.
    pub fee: FeeConfig,

    /// Request message policy.
    pub request: RequestConfig,

    /// Key derivation and encoding.
    pub keys: KeyConfig,

    /// Lifecycle polling policy.
    pub polling: PollConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chain_id: "band-laozi-testnet".to_string(),
            endpoint: "http://localhost:1317".to_string(),
            http_timeout_secs: 10,
            fee: FeeConfig::default(),
            request: RequestConfig::default(),
            keys: KeyConfig::default(),
            polling: PollConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Minimal configuration for a chain and endpoint, everything else default.
    pub fn new(chain_id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            chain_id: chain_id.into(),
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Endpoint without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    /// Per-call HTTP timeout.
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Fixed fee schedule. Not derived from message size.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Fee amount in the smallest unit of `denom`.
    pub amount: u64,

    /// Native fee denomination.
    pub denom: String,

    /// Gas limit.
    pub gas: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            amount: 100,
            denom: "uband".to_string(),
            gas: 380_000,
        }
    }
}

/// Request message policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Tag identifying this client in request messages.
    pub client_id: String,

    /// Transaction memo.
    pub memo: String,

    /// Broadcast mode ("block", "sync" or "async").
    pub broadcast_mode: String,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            client_id: "oracle-client".to_string(),
            memo: String::new(),
            broadcast_mode: "block".to_string(),
        }
    }
}

/// Key derivation and public key encoding.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyConfig {
    /// BIP-32 derivation path for the signing key.
    pub derivation_path: String,

    /// Bech32 human readable prefix of account addresses.
    pub address_prefix: String,

    /// Hex bytes prepended to the raw public key before broadcast.
    pub pubkey_prefix_hex: String,

    /// Type tag of the public key produced by the signer.
    pub pubkey_type: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            derivation_path: "m/44'/494'/0'/0/0".to_string(),
            address_prefix: "band".to_string(),
            pubkey_prefix_hex: "eb5ae98721".to_string(),
            pubkey_type: "tendermint/PubKeySecp256k1".to_string(),
        }
    }
}

impl KeyConfig {
    /// Decoded public key prefix. Empty if the hex is invalid, which
    /// validation rejects up front.
    pub fn pubkey_prefix(&self) -> Vec<u8> {
        hex::decode(&self.pubkey_prefix_hex).unwrap_or_default()
    }
}

/// Polling policy shared by every lifecycle phase.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PollConfig {
    /// Delay between attempts in milliseconds.
    pub interval_ms: u64,

    /// Upper bound for the delay when spacing grows exponentially.
    /// Equal to `interval_ms` for a fixed interval.
    pub max_interval_ms: u64,

    /// Deadline for a whole poll in seconds (0 = no deadline).
    pub timeout_secs: u64,

    /// Maximum number of attempts per poll.
    pub max_attempts: Option<u32>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            max_interval_ms: 100,
            timeout_secs: 120,
            max_attempts: None,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
