//! Oracle request lifecycle.
//!
//! # Data Flow
//! ```text
//! OracleClient::get_oracle_script → OracleScript (schema)
//! params + schema → Codec::encode_input → calldata
//!     → TxBuilder → Broadcaster(Signer) → tx hash
//!     → poll /txs/{hash}               → request id
//!     → poll /oracle/requests/{id}     → result     ┐ independent,
//!     → poll /bandchain/proof/{id}     → proof      ┘ may run concurrently
//! params → poll /oracle/request_search → Codec::decode_output → canonical fields
//! ```

pub mod client;
pub mod extract;
pub mod types;

pub use client::OracleClient;
pub use types::{DecodedField, MatchingResult, OracleScript, RequestOutcome};
