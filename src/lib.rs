//! # Serpstat MCP
//!
//! Serpstat SEO API exposed as Model Context Protocol tools:
//! - Declarative parameter schemas built from reusable constraint primitives
//! - A validation engine that reports every violation with its path
//! - A JSON-RPC client with bounded fixed-delay retry of transient failures
//! - One generic tool handler driven by a data table of tool definitions
//!
//! ## Request flow
//!
//! ```text
//!   tools/call ─→ ToolRegistry ─→ ToolHandler ─→ Schema::validate
//!                                     │                │
//!                                     │        normalized params
//!                                     ▼                │
//!                              SerpstatClient ←────────┘
//!                                     │  retry loop
//!                                     ▼
//!                                Transport (HTTP POST)
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod mcp;
pub mod rpc;
pub mod schema;
pub mod tools;
pub mod types;

// Internal utilities
pub mod observability;
pub mod validation;

pub use types::{Config, Error, Result};
