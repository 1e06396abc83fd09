//! Transport seam: one attempt, one classified outcome.
//!
//! Classification happens here, once, so the retry loop only has to ask
//! `Error::is_retryable()`:
//!
//! | Outcome | Error |
//! |---|---|
//! | connect failure, timeout, reset while reading | `Transient` |
//! | HTTP 5xx | `Transient` |
//! | HTTP 2xx with undecodable body | `Protocol` |
//! | other HTTP status without an `error` payload | `Api` (status as code) |

use super::envelope::{RequestEnvelope, ResponseEnvelope};
use crate::types::{ApiConfig, Error, Result};
use async_trait::async_trait;
use std::fmt;

/// Sends one request envelope and returns the decoded response envelope.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, envelope: &RequestEnvelope) -> Result<ResponseEnvelope>;
}

/// HTTP POST transport with the token attached as a query parameter.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl HttpTransport {
    pub fn new(api: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(api.request_timeout)
            .user_agent(concat!("serpstat-mcp/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: api.base_url.clone(),
            token: api.token.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, envelope: &RequestEnvelope) -> Result<ResponseEnvelope> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("token", self.token.as_str())])
            .json(envelope)
            .send()
            .await
            .map_err(classify_request_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(classify_request_error)?;

        if status.is_server_error() {
            return Err(Error::transient(format!("Serpstat API returned HTTP {}", status)));
        }

        let parsed = serde_json::from_slice::<ResponseEnvelope>(&body);
        if status.is_success() {
            return parsed.map_err(|e| Error::protocol(format!("undecodable response body: {}", e)));
        }

        match parsed {
            Ok(envelope) if envelope.error.is_some() => Ok(envelope),
            _ => Err(Error::api(
                i64::from(status.as_u16()),
                format!("Serpstat API returned HTTP {}", status),
                None,
            )),
        }
    }
}

fn classify_request_error(err: reqwest::Error) -> Error {
    if err.is_builder() {
        Error::config(format!("invalid Serpstat API request: {}", err))
    } else if err.is_timeout() {
        Error::transient(format!("Request to Serpstat API timed out: {}", err))
    } else if err.is_connect() {
        Error::transient(format!("Could not connect to Serpstat API: {}", err))
    } else {
        Error::transient(format!("Request to Serpstat API failed: {}", err))
    }
}
