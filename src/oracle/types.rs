//! Oracle request data model.

use serde::{Deserialize, Serialize};

use crate::error::{OracleError, OracleResult};

/// A registered oracle script. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleScript {
    pub id: u64,
    /// Binary interface description handed to the codec.
    pub schema: String,
    /// Owner, name, description and whatever else the ledger reports.
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl OracleScript {
    /// Build from the `result` object of the oracle script endpoint.
    pub fn from_result(id: u64, result: &serde_json::Value) -> OracleResult<Self> {
        let mut metadata = result
            .as_object()
            .cloned()
            .ok_or_else(|| OracleError::Decode("oracle script result is not an object".into()))?;
        let schema = match metadata.remove("schema") {
            Some(serde_json::Value::String(schema)) => schema,
            _ => return Err(OracleError::Decode("oracle script has no schema".into())),
        };
        metadata.remove("id");

        Ok(Self {
            id,
            schema,
            metadata,
        })
    }

    /// Script name, if the ledger reported one.
    pub fn name(&self) -> Option<&str> {
        self.metadata.get("name").and_then(|v| v.as_str())
    }
}

/// One output field rendered to its canonical string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodedField {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    #[serde(rename = "fieldValue")]
    pub field_value: String,
}

impl DecodedField {
    pub fn new(field_name: impl Into<String>, field_value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_value: field_value.into(),
        }
    }
}

/// Latest resolved request sharing a script id, calldata and counts.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchingResult {
    /// Request packet as reported by the ledger.
    pub request_packet: Option<serde_json::Value>,
    /// Response packet with its `result` replaced by the decoded fields.
    pub response_packet: serde_json::Value,
    /// Decoded output fields in schema order.
    pub fields: Vec<DecodedField>,
}

/// Result and proof of a single request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    pub request_id: String,
    pub result: serde_json::Value,
    pub proof: serde_json::Value,
}
