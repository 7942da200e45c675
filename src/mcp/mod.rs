/// MCP protocol implementation
///
/// This module handles the Model Context Protocol communication:
/// JSON-RPC parsing and routing tool calls to the reading list tools.

pub mod protocol;
pub mod server;

// Re-export main types
pub use server::McpServer;
