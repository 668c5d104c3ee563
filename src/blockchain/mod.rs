//! Ledger integration subsystem.
//!
//! # Data Flow
//! ```text
//! Seed phrase / private key
//!     → wallet.rs (key derivation, address, signing)
//! AccountState + calldata + ValidatorCounts
//!     → transaction.rs (unsigned request message)
//!     → broadcast.rs (sign → pubkey.rs re-encode → POST)
//!     → client.rs (REST transport with timeouts)
//! ```
//!
//! # Security Constraints
//! - Never log seed phrases, private keys or signatures
//! - All REST calls have configurable timeouts
//! - Broadcasts are never retried automatically

pub mod broadcast;
pub mod client;
pub mod pubkey;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use broadcast::Broadcaster;
pub use client::{LedgerResponse, RestClient};
pub use pubkey::PubKeyEncoder;
pub use transaction::TxBuilder;
pub use types::{AccountState, BroadcastTx, SignedTx, UnsignedMessage, ValidatorCounts};
pub use wallet::{MnemonicWallet, Signer};
