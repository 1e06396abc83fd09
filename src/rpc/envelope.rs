//! Wire envelopes for the Serpstat JSON-RPC endpoint.
//!
//! ```text
//! → {"id": "<uuid>", "method": "SerpstatBacklinksProcedure.getSummaryV2", "params": {...}}
//! ← {"id": "<uuid>", "result": {...}}
//! ← {"id": "<uuid>", "error": {"code": -32602, "message": "...", "data": ...}}
//! ```

use crate::types::{Error, RequestId, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outbound call. Built once per logical call and resent unchanged on retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub id: RequestId,
    pub method: String,
    pub params: Map<String, Value>,
}

impl RequestEnvelope {
    pub fn new(method: impl Into<String>, params: Map<String, Value>) -> Self {
        Self {
            id: RequestId::new(),
            method: method.into(),
            params,
        }
    }
}

/// Structured failure reported by the remote method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteError {
    #[serde(default)]
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Inbound answer. A `null` result counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RemoteError>,
}

impl ResponseEnvelope {
    pub fn success(id: &RequestId, result: Value) -> Self {
        Self {
            id: Some(Value::String(id.to_string())),
            result: Some(result),
            error: None,
        }
    }

    /// Unwrap the terminal outcome. An `error` wins over a `result`; neither
    /// is a protocol violation.
    pub fn into_result(self) -> Result<Value> {
        match (self.error, self.result) {
            (Some(err), _) => Err(Error::api(err.code, err.message, err.data)),
            (None, Some(result)) => Ok(result),
            (None, None) => Err(Error::protocol("response carried neither result nor error")),
        }
    }
}
