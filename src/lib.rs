//! Remembar MCP
//!
//! A small protocol bridge that lets a messaging assistant save and recall
//! personal memories. Two MCP tools are translated into HTTP calls against an
//! existing vector-store backend, and every outcome comes back as a short,
//! readable sentence.
//!
//! # Architecture
//!
//! - **Tool Gateway**: validates tool arguments and renders replies
//! - **Backend Client**: one bounded HTTP call per invocation, errors
//!   normalized into `Unreachable` / `Rejected` / `BackendFault`
//! - **Server**: MCP over streamable HTTP (with `/healthz`) or stdio
//!
//! # Modules
//!
//! - [`backend`]: backend client, wire types and error taxonomy
//! - [`config`]: layered configuration (defaults, file, env, CLI)
//! - [`gateway`]: the `add_memory` / `search_memory` operations
//! - [`mcp`]: MCP tool definitions
//! - [`server`]: transports and the HTTP router
//! - [`telemetry`]: `tracing` subscriber setup (stderr)

pub mod backend;
pub mod config;
pub mod gateway;
pub mod mcp;
pub mod server;
pub mod telemetry;

use std::sync::Arc;

use crate::backend::{BackendClient, MemoryBackend};
use crate::config::AppConfig;
use crate::gateway::MemoryGateway;
use crate::mcp::MemoryServer;

/// Wire the backend client, gateway and MCP server together from `config`.
pub fn build_memory_server(config: &AppConfig) -> anyhow::Result<MemoryServer> {
    let client = BackendClient::new(&config.backend)?;
    let base_url = client.base_url().to_string();
    let backend: Arc<dyn MemoryBackend> = Arc::new(client);
    let gateway = MemoryGateway::new(backend, config.backend.tenant_id.clone());
    Ok(MemoryServer::new(gateway, base_url))
}
