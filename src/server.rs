use axum::{Json, Router, routing::get};
use rmcp::{
    ServiceExt,
    transport::{
        stdio,
        streamable_http_server::{
            StreamableHttpServerConfig, StreamableHttpService,
            session::local::LocalSessionManager,
        },
    },
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{AppConfig, Transport};
use crate::mcp::{MemoryServer, SERVER_NAME};

/// Path the streamable HTTP MCP endpoint is mounted at.
pub const MCP_PATH: &str = "/mcp";

/// Build the HTTP router: liveness probe plus the MCP endpoint.
///
/// The MCP service runs stateless, so every request gets a fresh handler
/// clone and no session bookkeeping survives between calls.
pub fn build_router(server: MemoryServer) -> Router {
    let mcp_service = StreamableHttpService::new(
        move || Ok(server.clone()),
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            stateful_mode: false,
            ..Default::default()
        },
    );

    Router::new()
        .route("/healthz", get(healthz))
        .nest_service(MCP_PATH, mcp_service)
        .layer(TraceLayer::new_for_http())
}

/// Liveness only: never touches the backend.
async fn healthz() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": SERVER_NAME,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Serve `server` over the transport selected in `config`.
pub async fn start_server(config: &AppConfig, server: MemoryServer) -> anyhow::Result<()> {
    match config.server.transport {
        Transport::Http => serve_http(config, server).await,
        Transport::Stdio => serve_stdio(server).await,
    }
}

async fn serve_http(config: &AppConfig, server: MemoryServer) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        mcp_path = MCP_PATH,
        backend_url = %config.backend.base_url,
        tenant_id = %config.backend.tenant_id,
        "Server started"
    );

    axum::serve(listener, build_router(server))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(name: "server.stopped", "Server stopped");
    Ok(())
}

async fn serve_stdio(server: MemoryServer) -> anyhow::Result<()> {
    info!(name: "server.started", transport = "stdio", "Serving MCP over stdio");

    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Server error: {:?}", e);
    })?;
    service.waiting().await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
