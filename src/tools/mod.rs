//! Serpstat tools: the data-driven catalogue, the generic handler and the
//! registry the MCP server dispatches through.
//!
//! Each category module is a table of `ToolDefinition`s. A definition is a
//! name, a remote method and a `Schema`; `ToolHandler` supplies the behavior
//! shared by all of them.

mod account;
mod backlinks;
mod category;
mod domains;
pub mod fields;
mod handler;
mod keywords;
mod registry;
mod response;
mod urls;

pub use category::ToolCategory;
pub use handler::{ToolCall, ToolDefinition, ToolDescriptor, ToolHandler};
pub use registry::{definitions, ToolRegistry};
pub use response::{ToolContent, ToolResponse};
