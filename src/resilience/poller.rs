//! Bounded polling of a ledger endpoint until a fact becomes observable.
//!
//! # State Machine
//! ```text
//! attempt ──GET──▶ extract ──Ready──▶ done (no further requests)
//!    ▲                │
//!    │             Pending (transport error, 404/5xx, field absent)
//!    │                │
//!    └──── delay ◀────┘
//!
//! Fatal (other 4xx)          → abort with the error
//! deadline / max attempts    → OracleError::Timeout
//! CancelToken fired          → OracleError::Cancelled
//! ```
//!
//! Attempts are strictly sequential: the next GET is only issued after the
//! previous response was fully read and the delay elapsed.

use std::fmt;
use std::future::Future;

use tokio::time::Instant;

use crate::blockchain::client::{LedgerResponse, RestClient};
use crate::config::PollConfig;
use crate::error::{OracleError, OracleResult};
use crate::lifecycle::cancel::CancelToken;
use crate::observability::metrics;
use crate::resilience::backoff::poll_delay;
use crate::resilience::retries::{classify_status, FailureClass};

/// Lifecycle phase being awaited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Transaction mined, request id assigned.
    RequestId,
    /// Proof bytes available.
    Proof,
    /// Aggregated result available.
    Result,
    /// Latest request with identical parameters resolved.
    MatchingResult,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::RequestId => "request_id",
            Phase::Proof => "proof",
            Phase::Result => "result",
            Phase::MatchingResult => "matching_result",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::RequestId => write!(f, "request id"),
            Phase::Proof => write!(f, "proof"),
            Phase::Result => write!(f, "result"),
            Phase::MatchingResult => write!(f, "matching result"),
        }
    }
}

/// Outcome of inspecting one response.
#[derive(Debug)]
pub enum Attempt<T> {
    /// The awaited fact is present.
    Ready(T),
    /// Not yet; try again.
    Pending,
    /// Will never succeed; stop polling.
    Fatal(OracleError),
}

impl<T> From<Option<T>> for Attempt<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Attempt::Ready(v),
            None => Attempt::Pending,
        }
    }
}

enum Interrupt {
    Deadline,
    Cancelled,
}

/// Polls one endpoint path with a bounded, cancellable schedule.
#[derive(Debug, Clone)]
pub struct LifecyclePoller {
    rest: RestClient,
    policy: PollConfig,
    cancel: CancelToken,
}

impl LifecyclePoller {
    pub fn new(rest: RestClient, policy: PollConfig, cancel: CancelToken) -> Self {
        Self {
            rest,
            policy,
            cancel,
        }
    }

    pub fn policy(&self) -> &PollConfig {
        &self.policy
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// GET `path` until `extract` yields [`Attempt::Ready`].
    pub async fn poll<T, F>(&self, phase: Phase, path: &str, mut extract: F) -> OracleResult<T>
    where
        F: FnMut(&LedgerResponse) -> Attempt<T>,
    {
        let started = Instant::now();
        let deadline = self.policy.deadline().map(|d| started + d);
        let mut cancel = self.cancel.clone();
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;

            let res = match guard(self.rest.get(path), deadline, &mut cancel).await {
                Ok(res) => res,
                Err(interrupt) => return Err(finish(interrupt, phase, attempts, started)),
            };

            match evaluate(res, &mut extract) {
                Attempt::Ready(value) => {
                    metrics::record_poll_attempt(phase, "ready");
                    metrics::record_poll_duration(phase, started.elapsed());
                    tracing::info!(phase = %phase, attempts, "Poll complete");
                    return Ok(value);
                }
                Attempt::Fatal(err) => {
                    metrics::record_poll_attempt(phase, "fatal");
                    tracing::warn!(phase = %phase, attempts, error = %err, "Poll aborted");
                    return Err(err);
                }
                Attempt::Pending => {
                    metrics::record_poll_attempt(phase, "pending");
                    tracing::debug!(phase = %phase, attempts, path, "Not ready yet");
                }
            }

            if let Some(max) = self.policy.max_attempts {
                if attempts >= max {
                    return Err(finish(Interrupt::Deadline, phase, attempts, started));
                }
            }

            let delay = poll_delay(&self.policy, attempts);
            if let Err(interrupt) = guard(tokio::time::sleep(delay), deadline, &mut cancel).await {
                return Err(finish(interrupt, phase, attempts, started));
            }
        }
    }
}

/// Race `fut` against the deadline and the cancel token. Cancellation is
/// checked first so an already cancelled token never issues a request.
async fn guard<F: Future>(
    fut: F,
    deadline: Option<Instant>,
    cancel: &mut CancelToken,
) -> Result<F::Output, Interrupt> {
    let expiry = async move {
        match deadline {
            Some(at) => tokio::time::sleep_until(at).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Interrupt::Cancelled),
        _ = expiry => Err(Interrupt::Deadline),
        out = fut => Ok(out),
    }
}

fn finish(interrupt: Interrupt, phase: Phase, attempts: u32, started: Instant) -> OracleError {
    metrics::record_poll_duration(phase, started.elapsed());
    match interrupt {
        Interrupt::Cancelled => {
            tracing::info!(phase = %phase, attempts, "Poll cancelled");
            OracleError::Cancelled { phase }
        }
        Interrupt::Deadline => {
            let elapsed_ms = started.elapsed().as_millis() as u64;
            tracing::warn!(phase = %phase, attempts, elapsed_ms, "Poll timed out");
            OracleError::Timeout {
                phase,
                attempts,
                elapsed_ms,
            }
        }
    }
}

fn evaluate<T, F>(res: OracleResult<LedgerResponse>, extract: &mut F) -> Attempt<T>
where
    F: FnMut(&LedgerResponse) -> Attempt<T>,
{
    match res {
        Err(err) => {
            tracing::debug!(error = %err, "Transient transport failure");
            Attempt::Pending
        }
        Ok(res) if res.is_success() => extract(&res),
        Ok(res) => match classify_status(res.status) {
            FailureClass::Transient => Attempt::Pending,
            FailureClass::Fatal => Attempt::Fatal(OracleError::Api {
                status: res.status,
                message: res.text,
            }),
        },
    }
}
