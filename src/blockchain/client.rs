//! Ledger REST client with per-call timeouts.
//!
//! # Responsibilities
//! - Issue GET/POST calls against the configured endpoint
//! - Bound every call with the configured HTTP timeout
//! - Hand back status + body without interpreting either
//!
//! Interpretation (not found vs. not yet vs. fatal) belongs to the caller.

use std::time::Duration;

use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{OracleError, OracleResult};

/// A raw ledger response.
#[derive(Debug, Clone)]
pub struct LedgerResponse {
    pub status: u16,
    /// Parsed JSON body, `Null` when the body is not JSON.
    pub body: serde_json::Value,
    pub text: String,
}

impl LedgerResponse {
    pub fn new(status: u16, text: impl Into<String>) -> Self {
        let text = text.into();
        let body = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
        Self { status, body, text }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `result` member of the usual REST envelope.
    pub fn result(&self) -> Option<&serde_json::Value> {
        self.body.get("result").filter(|v| !v.is_null())
    }
}

/// REST client bound to one ledger endpoint.
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl RestClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: &ClientConfig) -> OracleResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| OracleError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            timeout: config.http_timeout(),
        })
    }

    /// Absolute URL for an endpoint path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a path. Fails only on transport errors.
    pub async fn get(&self, path: &str) -> OracleResult<LedgerResponse> {
        let res = self.http.get(self.url(path)).send().await?;
        Self::read(res).await
    }

    /// POST a JSON body to a path. Fails only on transport errors.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> OracleResult<LedgerResponse> {
        let res = self.http.post(self.url(path)).json(body).send().await?;
        Self::read(res).await
    }

    async fn read(res: reqwest::Response) -> OracleResult<LedgerResponse> {
        let status = res.status().as_u16();
        let text = res.text().await?;
        Ok(LedgerResponse::new(status, text))
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
