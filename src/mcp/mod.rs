//! Model Context Protocol (MCP) server surface.
//!
//! Exposes the memory gateway as MCP tools:
//!
//! - `add_memory`: `{text, priority?, tags?}`
//! - `search_memory`: `{query}`
//! - `server_info`: static server description, no backend call
//!
//! The same [`tools::MemoryServer`] is served over streamable HTTP (see
//! [`crate::server`]) or stdio.

pub mod tools;

pub use tools::{AddMemoryArgs, MemoryServer, SearchMemoryArgs};

/// Name advertised during MCP initialization.
pub const SERVER_NAME: &str = "RemembarMCP";
