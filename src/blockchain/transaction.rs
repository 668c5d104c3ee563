//! Oracle request transaction building.
//!
//! # Responsibilities
//! - Assemble the single oracle request message
//! - Attach the configured fee, memo and client tag
//! - Serialize every numeric field as a decimal string
//!
//! Building is pure. Account state is fetched by the caller immediately
//! before each build; nothing here caches or increments sequences.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::blockchain::types::{
    AccountState, Coin, Fee, RequestData, RequestMsg, UnsignedMessage, ValidatorCounts,
};
use crate::config::{ClientConfig, FeeConfig, RequestConfig};

/// Amino type of the oracle request message.
pub const REQUEST_MSG_TYPE: &str = "oracle/Request";

/// Builder for oracle request transactions.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    fee: FeeConfig,
    request: RequestConfig,
}

impl TxBuilder {
    /// Create a builder with an explicit fee schedule and request policy.
    pub fn new(fee: FeeConfig, request: RequestConfig) -> Self {
        Self { fee, request }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.fee.clone(), config.request.clone())
    }

    /// Build the unsigned request message.
    ///
    /// # Arguments
    /// * `account` - Freshly fetched state of the sending account
    /// * `oracle_script_id` - Script to execute
    /// * `calldata` - Encoded call parameters
    /// * `counts` - Validators asked / required; not checked here
    /// * `chain_id` - Ledger chain identifier
    pub fn build(
        &self,
        account: &AccountState,
        oracle_script_id: u64,
        calldata: &[u8],
        counts: ValidatorCounts,
        chain_id: &str,
    ) -> UnsignedMessage {
        let msg = RequestMsg {
            msg_type: REQUEST_MSG_TYPE.to_string(),
            value: RequestData {
                oracle_script_id: oracle_script_id.to_string(),
                calldata: STANDARD.encode(calldata),
                ask_count: counts.ask_count.to_string(),
                min_count: counts.min_count.to_string(),
                client_id: self.request.client_id.clone(),
                sender: account.address.clone(),
            },
        };

        tracing::debug!(
            oracle_script_id,
            ask_count = counts.ask_count,
            min_count = counts.min_count,
            sequence = account.sequence,
            "Built oracle request message"
        );

        UnsignedMessage {
            msgs: vec![msg],
            chain_id: chain_id.to_string(),
            fee: self.fee(),
            memo: self.request.memo.clone(),
            account_number: account.account_number.to_string(),
            sequence: account.sequence.to_string(),
        }
    }

    /// Fee attached to every message.
    pub fn fee(&self) -> Fee {
        Fee {
            amount: vec![Coin {
                amount: self.fee.amount.to_string(),
                denom: self.fee.denom.clone(),
            }],
            gas: self.fee.gas.to_string(),
        }
    }
}

impl Default for TxBuilder {
    fn default() -> Self {
        Self::new(FeeConfig::default(), RequestConfig::default())
    }
}
