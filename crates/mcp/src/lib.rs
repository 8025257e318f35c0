// MCP (Model Context Protocol) server exposing the PulseMCP server directory
// to agent clients as a `list_servers` tool.

pub mod codec;
pub mod error;
pub mod protocol;
pub mod server;
pub mod tools;

pub use error::{McpError, McpResult};
pub use server::McpServer;
