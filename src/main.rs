//! Remembar MCP server entry point.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use clap::Parser;
use dotenvy::dotenv;
use tracing::info;

use remembar_mcp::{
    build_memory_server,
    config::{AppConfig, Cli},
    server::start_server,
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before anything reads the environment
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED)
    telemetry::init();

    // --help and --version print and exit here
    let cli = Cli::parse();

    let config = match AppConfig::from_cli(cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e:#}");
            std::process::exit(1);
        }
    };

    info!(
        name: "backend.config.loaded",
        base_url = %config.backend.base_url,
        tenant_id = %config.backend.tenant_id,
        timeout_secs = config.backend.timeout_secs,
        "Backend configuration loaded"
    );

    let server = build_memory_server(&config)?;
    start_server(&config, server).await
}
