//! Public key re-encoding for signature verification.
//!
//! The ledger verifies signatures against a length-prefixed compressed key
//! descriptor (`eb5ae987` type prefix + `21` length byte for secp256k1),
//! not the typed JSON key a generic signer emits. Every signature in an
//! envelope is rewritten before broadcast; the type change from
//! [`SignedTx`] to [`BroadcastTx`] makes a second rewrite impossible.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::blockchain::types::{BroadcastTx, Signature, SignedEnvelope, SignedTx, StdTx};
use crate::config::KeyConfig;
use crate::error::OracleResult;

/// Prepends a fixed byte prefix to raw public keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PubKeyEncoder {
    prefix: Vec<u8>,
}

impl PubKeyEncoder {
    pub fn new(prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn from_config(keys: &KeyConfig) -> Self {
        Self::new(keys.pubkey_prefix())
    }

    /// Re-encode one base64 raw key as base64(prefix || key).
    pub fn reencode(&self, raw_public_key_b64: &str) -> OracleResult<String> {
        let raw = STANDARD.decode(raw_public_key_b64)?;
        let mut out = Vec::with_capacity(self.prefix.len() + raw.len());
        out.extend_from_slice(&self.prefix);
        out.extend_from_slice(&raw);
        Ok(STANDARD.encode(out))
    }

    /// Rewrite the public key of every signature, returning a new envelope.
    pub fn encode_envelope(&self, signed: SignedTx) -> OracleResult<BroadcastTx> {
        let SignedEnvelope { tx, mode } = signed;
        let signatures = tx
            .signatures
            .into_iter()
            .map(|sig| {
                Ok(Signature {
                    pub_key: self.reencode(&sig.pub_key.value)?,
                    signature: sig.signature,
                    account_number: sig.account_number,
                    sequence: sig.sequence,
                })
            })
            .collect::<OracleResult<Vec<_>>>()?;

        Ok(SignedEnvelope {
            tx: StdTx {
                msg: tx.msg,
                fee: tx.fee,
                signatures,
                memo: tx.memo,
            },
            mode,
        })
    }
}

impl Default for PubKeyEncoder {
    fn default() -> Self {
        Self::from_config(&KeyConfig::default())
    }
}
