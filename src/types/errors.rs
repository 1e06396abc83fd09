//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation. The
//! `Display` text of each variant is what a tool caller ends up reading, so
//! the remote and validation variants carry their messages verbatim.

use crate::schema::ValidationErrors;
use serde_json::Value;
use thiserror::Error;

/// Fixed message for a response that carries neither `result` nor `error`.
pub const NO_RESULT_MESSAGE: &str = "No result data received from Serpstat API";

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the Serpstat MCP server.
#[derive(Error, Debug)]
pub enum Error {
    /// Tool arguments failed schema validation. Never reaches the network.
    #[error("Invalid parameters: {0}")]
    Validation(ValidationErrors),

    /// The remote method ran and reported a domain failure.
    #[error("{message}")]
    Api {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// Connection failure, timeout, or HTTP 5xx. Retried.
    #[error("{0}")]
    Transient(String),

    /// Response with neither `result` nor `error`, or not an envelope at all.
    #[error("No result data received from Serpstat API")]
    Protocol { detail: String },

    /// Invalid configuration or schema construction.
    #[error("configuration error: {0}")]
    Config(String),

    /// Unknown tool or JSON-RPC method.
    #[error("{0}")]
    NotFound(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Only transient failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transient(_))
    }

    /// Short outcome label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::Api { .. } => "application",
            Error::Transient(_) => "transient",
            Error::Protocol { .. } => "protocol",
            Error::Config(_) => "config",
            Error::NotFound(_) => "not_found",
            Error::Serialization(_) => "serialization",
            Error::Io(_) => "io",
        }
    }
}

// Convenience constructors
impl Error {
    pub fn api(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self::Api {
            code,
            message: message.into(),
            data,
        }
    }

    pub fn transient(msg: impl Into<String>) -> Self {
        Self::Transient(msg.into())
    }

    pub fn protocol(detail: impl Into<String>) -> Self {
        Self::Protocol {
            detail: detail.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}
