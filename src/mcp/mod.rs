//! Model Context Protocol front end over stdio.
//!
//! Newline-delimited JSON-RPC 2.0. Each request is handled on its own task;
//! a single writer task owns stdout so replies never interleave.

pub mod codec;
pub mod server;

pub use server::{McpServer, PROTOCOL_VERSION};
