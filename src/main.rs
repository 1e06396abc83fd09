//! Serpstat MCP server: main entry point.
//!
//! Speaks MCP over stdio. Configuration comes from the environment
//! (`SERPSTAT_API_TOKEN`, `SERPSTAT_API_URL`, `SERPSTAT_MAX_RETRIES`, ...);
//! flags override it.

use clap::Parser;
use serpstat_mcp::mcp::McpServer;
use serpstat_mcp::rpc::SerpstatClient;
use serpstat_mcp::tools::{definitions, ToolCategory, ToolRegistry};
use serpstat_mcp::types::{ENV_API_TOKEN, ENV_API_URL};
use serpstat_mcp::Config;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "serpstat-mcp")]
#[command(about = "Serpstat SEO API as MCP tools over stdio", version)]
struct Cli {
    /// Serpstat API token
    #[arg(long, env = ENV_API_TOKEN, hide_env_values = true)]
    token: Option<String>,

    /// Serpstat JSON-RPC endpoint
    #[arg(long, env = ENV_API_URL)]
    api_url: Option<String>,

    /// Retries after the first attempt for transient failures
    #[arg(long)]
    max_retries: Option<u32>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Print the enabled tools and exit
    #[arg(long)]
    list_tools: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(token) = cli.token {
        config.api.token = token;
    }
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    if let Some(max_retries) = cli.max_retries {
        config.api.max_retries = max_retries;
    }
    if let Some(level) = cli.log_level {
        config.observability.log_level = level.to_ascii_lowercase();
    }

    if cli.list_tools {
        let enabled: Vec<ToolCategory> = ToolCategory::ALL
            .into_iter()
            .filter(|c| config.tools.is_enabled(*c))
            .collect();
        for def in definitions(&enabled)? {
            println!("{:<32} {:<10} {}", def.name, def.category.as_str(), def.description);
        }
        return Ok(());
    }

    config.validate()?;
    serpstat_mcp::observability::init_tracing(&config.observability);

    tracing::info!(
        endpoint = %config.api.base_url,
        max_retries = config.api.max_retries,
        retry_delay = ?config.api.retry_delay,
        "starting serpstat-mcp"
    );

    let client = Arc::new(SerpstatClient::from_config(&config.api)?);
    let registry = Arc::new(ToolRegistry::from_config(&config.tools, client)?);

    McpServer::new(registry).serve_stdio().await?;
    Ok(())
}
