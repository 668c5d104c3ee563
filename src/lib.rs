//! Client for submitting data-oracle requests to a proof-of-stake ledger and
//! retrieving their results and proofs.

pub mod blockchain;
pub mod codec;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod oracle;
pub mod resilience;

pub use blockchain::{MnemonicWallet, Signer, ValidatorCounts};
pub use codec::{Codec, CodecError, DecodedValue};
pub use config::ClientConfig;
pub use error::{OracleError, OracleResult};
pub use lifecycle::{CancelToken, Cancellation};
pub use oracle::{DecodedField, MatchingResult, OracleClient, OracleScript, RequestOutcome};
