//! Extraction of lifecycle facts from ledger responses.
//!
//! Each function inspects one successful (2xx) response and reports whether
//! the awaited fact is present. Shapes:
//!
//! ```text
//! GET /txs/{hash}                 {raw_log: "<JSON array of message logs>", code?}
//! GET /bandchain/proof/{id}       {result: {evmProofBytes}}
//! GET /oracle/requests/{id}       {result: {result}}
//! GET /oracle/request_search?...  {result: {result: {RequestPacketData, ResponsePacketData: {result: <base64>}}}}
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::blockchain::client::LedgerResponse;
use crate::codec::{stringify, Codec, DecodedValue};
use crate::error::{OracleError, OracleResult};
use crate::oracle::types::{DecodedField, MatchingResult};
use crate::resilience::poller::Attempt;

/// Event emitted by the oracle module for a new request.
pub const REQUEST_EVENT_TYPE: &str = "request";
/// Attribute of [`REQUEST_EVENT_TYPE`] carrying the request id.
pub const REQUEST_ID_ATTRIBUTE: &str = "id";

/// Request id from a transaction-by-hash response.
///
/// A transaction that executed with a non-zero code will never emit a
/// request, so it aborts the poll.
pub fn request_id(res: &LedgerResponse) -> Attempt<String> {
    if let Some(code) = res.body.get("code").and_then(|c| c.as_u64()) {
        if code != 0 {
            let raw_log = res
                .body
                .get("raw_log")
                .and_then(|l| l.as_str())
                .unwrap_or_default()
                .to_string();
            return Attempt::Fatal(OracleError::RejectedTransaction {
                code: u32::try_from(code).unwrap_or(u32::MAX),
                raw_log,
            });
        }
    }

    let logs = match res
        .body
        .get("raw_log")
        .and_then(|l| l.as_str())
        .and_then(|l| serde_json::from_str::<serde_json::Value>(l).ok())
    {
        Some(logs) => logs,
        None => return Attempt::Pending,
    };

    find_request_id(&logs).into()
}

/// Locate the request id in parsed message logs.
///
/// Looks for the `request` event's `id` attribute by name. Logs that do not
/// name their events fall back to the positional layout
/// `[0].events[2].attributes[0].value`, which is where the oracle module
/// places it when events are sorted by type.
pub fn find_request_id(logs: &serde_json::Value) -> Option<String> {
    let named = logs
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|log| log.get("events").and_then(|e| e.as_array()))
        .flatten()
        .filter(|event| event.get("type").and_then(|t| t.as_str()) == Some(REQUEST_EVENT_TYPE))
        .filter_map(|event| event.get("attributes").and_then(|a| a.as_array()))
        .flatten()
        .find(|attr| attr.get("key").and_then(|k| k.as_str()) == Some(REQUEST_ID_ATTRIBUTE))
        .and_then(|attr| scalar_string(attr.get("value")?));

    named.or_else(|| scalar_string(logs.get(0)?.get("events")?.get(2)?.get("attributes")?.get(0)?.get("value")?))
}

/// Proof bytes from a proof-by-request-id response.
pub fn proof(res: &LedgerResponse) -> Attempt<serde_json::Value> {
    present(res.result().and_then(|r| r.get("evmProofBytes"))).into()
}

/// Aggregated result from a request-by-id response.
pub fn result(res: &LedgerResponse) -> Attempt<serde_json::Value> {
    present(res.result().and_then(|r| r.get("result"))).into()
}

/// Decoded result from a request search response.
///
/// A search hit without a response packet is not resolved yet. Undecodable
/// result bytes abort the poll.
pub fn matching_result(res: &LedgerResponse, codec: &dyn Codec, schema: &str) -> Attempt<MatchingResult> {
    let found = match present(res.result().and_then(|r| r.get("result"))) {
        Some(found) => found,
        None => return Attempt::Pending,
    };
    let mut response_packet = match present(found.get("ResponsePacketData")) {
        Some(packet) => packet,
        None => return Attempt::Pending,
    };

    let encoded = match response_packet.get("result").and_then(|r| r.as_str()) {
        Some(encoded) => encoded,
        None => {
            return Attempt::Fatal(OracleError::Decode(
                "response packet has no result bytes".into(),
            ))
        }
    };

    let fields = match STANDARD
        .decode(encoded)
        .map_err(OracleError::from)
        .and_then(|bytes| decode_fields(codec, schema, &bytes))
    {
        Ok(fields) => fields,
        Err(err) => return Attempt::Fatal(err),
    };

    response_packet["result"] = match serde_json::to_value(&fields) {
        Ok(value) => value,
        Err(err) => return Attempt::Fatal(err.into()),
    };

    Attempt::Ready(MatchingResult {
        request_packet: present(found.get("RequestPacketData")),
        response_packet,
        fields,
    })
}

/// Decode result bytes and render each top-level field canonically.
pub fn decode_fields(codec: &dyn Codec, schema: &str, bytes: &[u8]) -> OracleResult<Vec<DecodedField>> {
    match codec.decode_output(schema, bytes)? {
        DecodedValue::Map(entries) => Ok(entries
            .into_iter()
            .map(|(name, value)| DecodedField::new(name, stringify(&value)))
            .collect()),
        other => Err(OracleError::Decode(format!(
            "expected a struct of output fields, got {}",
            stringify(&other)
        ))),
    }
}

fn present(value: Option<&serde_json::Value>) -> Option<serde_json::Value> {
    value.filter(|v| !v.is_null()).cloned()
}

fn scalar_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
