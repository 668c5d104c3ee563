//! Oracle client facade.
//!
//! # Responsibilities
//! - Look up oracle scripts and account state
//! - Encode parameters, build, sign and broadcast request transactions
//! - Await request id, result and proof through bounded polls
//! - Decode and canonicalize search results
//!
//! The client holds no mutable state. Clones share the HTTP connection pool
//! and may run any number of requests concurrently.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::broadcast::Broadcaster;
use crate::blockchain::client::RestClient;
use crate::blockchain::pubkey::PubKeyEncoder;
use crate::blockchain::transaction::TxBuilder;
use crate::blockchain::types::{AccountState, UnsignedMessage, ValidatorCounts};
use crate::blockchain::wallet::Signer;
use crate::codec::Codec;
use crate::config::validation::validate_config;
use crate::config::{ClientConfig, PollConfig};
use crate::error::{OracleError, OracleResult};
use crate::lifecycle::cancel::CancelToken;
use crate::oracle::extract;
use crate::oracle::types::{MatchingResult, OracleScript, RequestOutcome};
use crate::resilience::poller::{LifecyclePoller, Phase};

/// Client for submitting oracle requests and retrieving their results.
#[derive(Clone)]
pub struct OracleClient {
    config: Arc<ClientConfig>,
    rest: RestClient,
    codec: Arc<dyn Codec>,
    builder: TxBuilder,
    broadcaster: Broadcaster,
    poller: LifecyclePoller,
}

impl OracleClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `config` - Validated before use
    /// * `codec` - Encoder/decoder for oracle script schemas
    pub fn new(config: ClientConfig, codec: Arc<dyn Codec>) -> OracleResult<Self> {
        validate_config(&config).map_err(|errors| {
            OracleError::Config(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        })?;

        let rest = RestClient::new(&config)?;
        let broadcaster = Broadcaster::new(
            rest.clone(),
            PubKeyEncoder::from_config(&config.keys),
            config.request.broadcast_mode.clone(),
        );
        let poller = LifecyclePoller::new(rest.clone(), config.polling.clone(), CancelToken::never());

        tracing::info!(
            endpoint = %config.base_url(),
            chain_id = %config.chain_id,
            "Oracle client initialized"
        );

        Ok(Self {
            builder: TxBuilder::from_config(&config),
            config: Arc::new(config),
            rest,
            codec,
            broadcaster,
            poller,
        })
    }

    /// A clone whose polls stop when `token` fires.
    pub fn with_cancel(&self, token: CancelToken) -> Self {
        let mut client = self.clone();
        client.poller = LifecyclePoller::new(self.rest.clone(), self.poller.policy().clone(), token);
        client
    }

    /// A clone polling with a different policy.
    pub fn with_poll_config(&self, policy: PollConfig) -> Self {
        let mut client = self.clone();
        client.poller = LifecyclePoller::new(self.rest.clone(), policy, self.cancel_token());
        client
    }

    fn cancel_token(&self) -> CancelToken {
        self.poller.cancel_token()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch a registered oracle script.
    pub async fn get_oracle_script(&self, oracle_script_id: u64) -> OracleResult<OracleScript> {
        let res = self
            .rest
            .get(&format!("/oracle/oracle_scripts/{}", oracle_script_id))
            .await?;

        if res.status == 404 {
            return Err(OracleError::NotFound(oracle_script_id));
        }
        if !res.is_success() {
            return Err(OracleError::Api {
                status: res.status,
                message: res.text,
            });
        }

        let result = res.result().ok_or(OracleError::NotFound(oracle_script_id))?;
        let script = OracleScript::from_result(oracle_script_id, result)?;
        tracing::debug!(oracle_script_id, name = ?script.name(), "Oracle script fetched");
        Ok(script)
    }

    /// Fetch the current account number and sequence of `address`.
    pub async fn get_account(&self, address: &str) -> OracleResult<AccountState> {
        let res = self.rest.get(&format!("/auth/accounts/{}", address)).await?;
        if !res.is_success() {
            return Err(OracleError::Api {
                status: res.status,
                message: res.text,
            });
        }

        let value = res
            .result()
            .and_then(|r| r.get("value"))
            .ok_or_else(|| OracleError::Decode(format!("no account data for {}", address)))?;

        Ok(AccountState {
            address: address.to_string(),
            account_number: decimal_field(value, "account_number")?,
            sequence: decimal_field(value, "sequence")?,
        })
    }

    /// Encode call parameters with the script's schema.
    pub fn encode_calldata(&self, script: &OracleScript, params: &serde_json::Value) -> OracleResult<Vec<u8>> {
        Ok(self.codec.encode_input(&script.schema, params)?)
    }

    /// Build an unsigned request message for `sender` using fresh account state.
    pub async fn build_request_msg(
        &self,
        script: &OracleScript,
        params: &serde_json::Value,
        counts: ValidatorCounts,
        sender: &str,
    ) -> OracleResult<UnsignedMessage> {
        let calldata = self.encode_calldata(script, params)?;
        let account = self.get_account(sender).await?;
        Ok(self
            .builder
            .build(&account, script.id, &calldata, counts, &self.config.chain_id))
    }

    /// Sign and broadcast a built message. Returns the transaction hash.
    pub async fn broadcast(&self, message: &UnsignedMessage, signer: &dyn Signer) -> OracleResult<String> {
        self.broadcaster.submit(message, signer).await
    }

    /// Wait until the transaction is indexed and return its request id.
    pub async fn get_request_id(&self, tx_hash: &str) -> OracleResult<String> {
        self.poller
            .poll(Phase::RequestId, &format!("/txs/{}", tx_hash), extract::request_id)
            .await
    }

    /// Submit an oracle request and return its ledger-assigned id.
    ///
    /// The broadcast is attempted once. Only the subsequent request id
    /// discovery is polled.
    pub async fn submit_request_tx(
        &self,
        script: &OracleScript,
        params: &serde_json::Value,
        counts: ValidatorCounts,
        signer: &dyn Signer,
    ) -> OracleResult<String> {
        let span = tracing::info_span!(
            "submit_request",
            flow_id = %Uuid::new_v4(),
            oracle_script_id = script.id
        );

        async move {
            let message = self
                .build_request_msg(script, params, counts, signer.address())
                .await?;
            let tx_hash = self.broadcast(&message, signer).await?;
            let request_id = self.get_request_id(&tx_hash).await?;
            tracing::info!(tx_hash = %tx_hash, request_id = %request_id, "Oracle request confirmed");
            Ok(request_id)
        }
        .instrument(span)
        .await
    }

    /// Wait for the request's proof.
    pub async fn get_request_proof(&self, request_id: &str) -> OracleResult<serde_json::Value> {
        self.poller
            .poll(Phase::Proof, &format!("/bandchain/proof/{}", request_id), extract::proof)
            .await
    }

    /// Wait for the request's aggregated result.
    pub async fn get_request_result(&self, request_id: &str) -> OracleResult<serde_json::Value> {
        self.poller
            .poll(Phase::Result, &format!("/oracle/requests/{}", request_id), extract::result)
            .await
    }

    /// Wait for result and proof concurrently.
    pub async fn get_request_outcome(&self, request_id: &str) -> OracleResult<RequestOutcome> {
        let (result, proof) = futures_util::future::try_join(
            self.get_request_result(request_id),
            self.get_request_proof(request_id),
        )
        .await?;

        Ok(RequestOutcome {
            request_id: request_id.to_string(),
            result,
            proof,
        })
    }

    /// Wait for the latest resolved request with exactly these parameters
    /// and return its decoded result.
    pub async fn get_last_matching_request_result(
        &self,
        script: &OracleScript,
        params: &serde_json::Value,
        min_count: u64,
        ask_count: u64,
    ) -> OracleResult<MatchingResult> {
        let calldata = hex::encode(self.encode_calldata(script, params)?);
        let path = format!(
            "/oracle/request_search?oid={}&calldata={}&min_count={}&ask_count={}",
            script.id, calldata, min_count, ask_count
        );
        let codec = self.codec.clone();

        self.poller
            .poll(Phase::MatchingResult, &path, |res| {
                extract::matching_result(res, codec.as_ref(), &script.schema)
            })
            .await
    }
}

impl std::fmt::Debug for OracleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OracleClient")
            .field("endpoint", &self.config.endpoint)
            .field("chain_id", &self.config.chain_id)
            .finish()
    }
}

/// Read a non-negative integer sent either as a decimal string or a JSON
/// number. Missing or empty means 0.
fn decimal_field(value: &serde_json::Value, key: &str) -> OracleResult<u64> {
    match value.get(key) {
        None | Some(serde_json::Value::Null) => Ok(0),
        Some(serde_json::Value::String(s)) if s.is_empty() => Ok(0),
        Some(serde_json::Value::String(s)) => s
            .parse()
            .map_err(|e| OracleError::Decode(format!("invalid {} '{}': {}", key, s, e))),
        Some(serde_json::Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| OracleError::Decode(format!("invalid {} {}", key, n))),
        Some(other) => Err(OracleError::Decode(format!("invalid {} {}", key, other))),
    }
}
