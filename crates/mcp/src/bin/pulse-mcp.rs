// Standalone MCP server binary

use anyhow::Result;
use clap::Parser;
use pulse_mcp::server::McpServer;
use pulse_mcp::tools::{ListServersTool, ToolRegistry};
use pulse_sdk::{PulseClient, RetryConfig, DEFAULT_BASE_URL};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "pulse-mcp")]
#[command(about = "MCP server for searching the PulseMCP server directory", long_about = None)]
struct Args {
    /// Base URL of the PulseMCP API
    #[arg(long, env = "PULSE_API_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Timeout for each API request, in seconds
    #[arg(long, default_value = "30")]
    timeout_secs: u64,

    /// Retries for rate-limited or failed API requests
    #[arg(long, default_value = "0")]
    max_retries: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol, so diagnostics go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse();

    let client = PulseClient::builder()
        .base_url(&args.base_url)
        .timeout(Duration::from_secs(args.timeout_secs))
        .retry_config(RetryConfig::with_max_retries(args.max_retries))
        .user_agent(format!("pulse-mcp/{}", env!("CARGO_PKG_VERSION")))
        .build()?;

    tracing::debug!(base_url = %client.config().base_url, "API client ready");

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ListServersTool::new(client)));

    tracing::info!("Registered {} tools", registry.len());

    let server = Arc::new(McpServer::new(registry));
    // Plain stderr line, independent of the log filter
    eprintln!("Pulse MCP server running on stdio");
    server.serve_stdio().await?;

    // A pending blocking read on stdin would otherwise keep the runtime alive.
    std::process::exit(0)
}
