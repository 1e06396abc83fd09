//! Resilient request client: bounded fixed-delay retry over a `Transport`.

use super::envelope::RequestEnvelope;
use super::transport::{HttpTransport, Transport};
use crate::types::{ApiConfig, Error, Result};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Retry bound and delay. No backoff growth, no jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            delay: Duration::from_secs(1),
        }
    }
}

impl From<&ApiConfig> for RetryPolicy {
    fn from(api: &ApiConfig) -> Self {
        Self {
            max_retries: api.max_retries,
            delay: api.retry_delay,
        }
    }
}

/// Per-call retry bookkeeping. Created for one logical call, dropped when
/// the call resolves.
#[derive(Debug)]
pub struct RetryState {
    attempts_remaining: u32,
    attempts_made: u32,
    last_error: Option<Error>,
}

impl RetryState {
    pub fn new(max_retries: u32) -> Self {
        Self {
            attempts_remaining: max_retries,
            attempts_made: 0,
            last_error: None,
        }
    }

    pub fn attempts_remaining(&self) -> u32 {
        self.attempts_remaining
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempts_made
    }

    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    fn begin_attempt(&mut self) -> u32 {
        self.attempts_made += 1;
        self.attempts_made
    }

    /// Record a failed attempt. Hands the error back when it is terminal:
    /// non-retryable, or the retry budget is spent.
    pub fn record_failure(&mut self, err: Error) -> std::result::Result<(), Error> {
        if err.is_retryable() && self.attempts_remaining > 0 {
            self.attempts_remaining -= 1;
            self.last_error = Some(err);
            Ok(())
        } else {
            Err(err)
        }
    }
}

/// Serpstat JSON-RPC client. Holds no mutable state across calls, so one
/// instance is shared by every tool handler.
#[derive(Clone)]
pub struct SerpstatClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl fmt::Debug for SerpstatClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerpstatClient")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl SerpstatClient {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// HTTP client from validated configuration.
    pub fn from_config(api: &ApiConfig) -> Result<Self> {
        let transport = HttpTransport::new(api)?;
        Ok(Self::new(Arc::new(transport), RetryPolicy::from(api)))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Invoke `method` with already-normalized `params`.
    ///
    /// Transient failures are retried with the identical envelope (same
    /// correlation id) up to `max_retries` times; everything else returns
    /// after the attempt that produced it.
    pub async fn call(&self, method: &str, params: Map<String, Value>) -> Result<Value> {
        let envelope = RequestEnvelope::new(method, params);
        let mut state = RetryState::new(self.policy.max_retries);

        loop {
            let attempt = state.begin_attempt();
            let started = Instant::now();
            let outcome = self
                .transport
                .send(&envelope)
                .await
                .and_then(|response| response.into_result());
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let err = match outcome {
                Ok(result) => {
                    tracing::info!(
                        method,
                        id = %envelope.id,
                        attempt,
                        elapsed_ms,
                        outcome = "ok",
                        "serpstat call succeeded"
                    );
                    return Ok(result);
                }
                Err(err) => err,
            };

            let kind = err.kind();
            let message = match &err {
                Error::Protocol { detail } => detail.clone(),
                other => other.to_string(),
            };

            match state.record_failure(err) {
                Ok(()) => {
                    tracing::warn!(
                        method,
                        id = %envelope.id,
                        attempt,
                        elapsed_ms,
                        outcome = kind,
                        error = %message,
                        retries_left = state.attempts_remaining(),
                        "serpstat call failed, retrying in {:?}",
                        self.policy.delay
                    );
                    tokio::time::sleep(self.policy.delay).await;
                }
                Err(err) => {
                    tracing::error!(
                        method,
                        id = %envelope.id,
                        attempt,
                        elapsed_ms,
                        outcome = kind,
                        error = %message,
                        "serpstat call failed"
                    );
                    return Err(err);
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
