//! Signing and broadcasting of request transactions.
//!
//! # Data Flow
//! ```text
//! UnsignedMessage
//!     → Signer::sign (SignedTx)
//!     → PubKeyEncoder::encode_envelope (BroadcastTx)
//!     → POST /txs
//!     → tx hash
//! ```
//!
//! A broadcast spends fees. It is never retried here: a transport failure
//! leaves the outcome unknown and is surfaced as-is, so a blind resubmit
//! cannot double-charge the account.

use crate::blockchain::client::RestClient;
use crate::blockchain::pubkey::PubKeyEncoder;
use crate::blockchain::types::{BroadcastResponse, BroadcastTx, UnsignedMessage};
use crate::blockchain::wallet::Signer;
use crate::error::{OracleError, OracleResult};
use crate::observability::metrics;

/// Path of the ledger's broadcast endpoint.
pub const BROADCAST_PATH: &str = "/txs";

/// Signs, re-encodes and submits transactions.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    rest: RestClient,
    encoder: PubKeyEncoder,
    mode: String,
}

impl Broadcaster {
    pub fn new(rest: RestClient, encoder: PubKeyEncoder, mode: impl Into<String>) -> Self {
        Self {
            rest,
            encoder,
            mode: mode.into(),
        }
    }

    /// Sign `message`, rewrite its public keys and broadcast it.
    ///
    /// Returns the transaction hash.
    pub async fn submit(&self, message: &UnsignedMessage, signer: &dyn Signer) -> OracleResult<String> {
        let signed = signer.sign(message, &self.mode)?;
        let envelope = self.encoder.encode_envelope(signed)?;
        self.broadcast(&envelope).await
    }

    /// POST an already encoded envelope.
    pub async fn broadcast(&self, envelope: &BroadcastTx) -> OracleResult<String> {
        let res = match self.rest.post_json(BROADCAST_PATH, envelope).await {
            Ok(res) => res,
            Err(e) => {
                tracing::warn!(error = %e, "Broadcast outcome unknown, not retrying");
                metrics::record_broadcast("transport_error");
                return Err(e);
            }
        };

        if !res.is_success() {
            tracing::warn!(status = res.status, body = %res.text, "Broadcast refused");
            metrics::record_broadcast("refused");
            return Err(OracleError::Broadcast {
                status: res.status,
                message: res.text,
            });
        }

        let parsed: BroadcastResponse = serde_json::from_value(res.body.clone())
            .map_err(|e| OracleError::Decode(format!("Malformed broadcast response: {}", e)))?;

        match parsed.code {
            Some(code) if code != 0 => {
                let raw_log = parsed.raw_log.unwrap_or_default();
                tracing::warn!(txhash = %parsed.txhash, code, raw_log = %raw_log, "Transaction rejected");
                metrics::record_broadcast("rejected");
                Err(OracleError::RejectedTransaction { code, raw_log })
            }
            _ => {
                tracing::info!(txhash = %parsed.txhash, "Transaction broadcast");
                metrics::record_broadcast("accepted");
                Ok(parsed.txhash)
            }
        }
    }
}
