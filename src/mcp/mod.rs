//! MCP server module
//!
//! Exposes the calculator over the Model Context Protocol (stdio transport).

pub mod server;

pub use server::OmeService;
