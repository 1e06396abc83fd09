//! Core types for the Serpstat MCP server.
//!
//! - **IDs**: correlation id for remote calls
//! - **Errors**: application error types with thiserror derives
//! - **Config**: API access, observability and tool-category configuration

mod config;
mod errors;
mod ids;

pub use config::{
    ApiConfig, Config, ObservabilityConfig, ToolsConfig, ENV_API_TOKEN, ENV_API_URL,
    ENV_LOG_FORMAT, ENV_LOG_LEVEL, ENV_MAX_RETRIES, ENV_REQUEST_TIMEOUT, ENV_RETRY_DELAY,
    ENV_TOOL_CATEGORIES,
};
pub use errors::{Error, Result, NO_RESULT_MESSAGE};
pub use ids::RequestId;
