//! Chain-specific wire types.
//!
//! Every number the ledger expects as a string (amounts, counts, ids,
//! account number, sequence) is carried as a decimal `String` here so that
//! values beyond 2^53 survive JSON round trips untouched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::OracleResult;

/// Account state as reported by the ledger. Fetched fresh per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountState {
    pub address: String,
    pub account_number: u64,
    /// Latest confirmed nonce; 0 when the account has never transacted.
    pub sequence: u64,
}

/// Number of validators asked vs. required to answer a request.
///
/// `ask_count >= min_count >= 1` is enforced by the ledger, not locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorCounts {
    pub ask_count: u64,
    pub min_count: u64,
}

impl ValidatorCounts {
    pub fn new(ask_count: u64, min_count: u64) -> Self {
        Self {
            ask_count,
            min_count,
        }
    }
}

/// A single fee coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub amount: String,
    pub denom: String,
}

/// Transaction fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas: String,
}

/// Body of an oracle request message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestData {
    pub oracle_script_id: String,
    /// Base64 of the encoded calldata.
    pub calldata: String,
    pub ask_count: String,
    pub min_count: String,
    pub client_id: String,
    pub sender: String,
}

/// Typed message wrapper as the ledger's amino JSON expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMsg {
    #[serde(rename = "type")]
    pub msg_type: String,
    pub value: RequestData,
}

/// Unsigned request transaction. Consumed once by a signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedMessage {
    pub msgs: Vec<RequestMsg>,
    pub chain_id: String,
    pub fee: Fee,
    pub memo: String,
    pub account_number: String,
    pub sequence: String,
}

impl UnsignedMessage {
    /// Canonical bytes covered by the signature: compact JSON with object
    /// keys sorted at every level and HTML-sensitive characters escaped the
    /// way the ledger's JSON encoder writes them.
    pub fn sign_bytes(&self) -> OracleResult<Vec<u8>> {
        let value = serde_json::to_value(self)?;
        Ok(escape_html(&sort_keys(value).to_string()).into_bytes())
    }
}

/// `&`, `<`, `>`, U+2028 and U+2029 as `\uXXXX`. Only ever appear inside
/// string literals in compact JSON, so a plain substitution is exact.
fn escape_html(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '&' => out.push_str("\\u0026"),
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out
}

fn sort_keys(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let sorted: BTreeMap<String, serde_json::Value> =
                map.into_iter().map(|(k, v)| (k, sort_keys(v))).collect();
            serde_json::Value::Object(sorted.into_iter().collect())
        }
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.into_iter().map(sort_keys).collect())
        }
        other => other,
    }
}

/// Public key as produced by the signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedPubKey {
    #[serde(rename = "type")]
    pub key_type: String,
    /// Base64 of the raw compressed key.
    pub value: String,
}

/// One signature entry. `K` is the public key representation, which changes
/// exactly once between signing and broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature<K> {
    pub signature: String,
    pub pub_key: K,
    pub account_number: String,
    pub sequence: String,
}

/// Signed transaction body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdTx<K> {
    pub msg: Vec<RequestMsg>,
    pub fee: Fee,
    pub signatures: Vec<Signature<K>>,
    pub memo: String,
}

/// Transaction plus broadcast mode, the body POSTed to the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedEnvelope<K> {
    pub tx: StdTx<K>,
    pub mode: String,
}

/// Envelope straight out of a signer.
pub type SignedTx = SignedEnvelope<TypedPubKey>;

/// Envelope whose public keys carry the ledger's prefixed encoding.
pub type BroadcastTx = SignedEnvelope<String>;

/// Ledger response to a broadcast.
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastResponse {
    pub txhash: String,
    /// Non-zero when the ledger rejected the transaction.
    #[serde(default)]
    pub code: Option<u32>,
    #[serde(default)]
    pub raw_log: Option<String>,
}
