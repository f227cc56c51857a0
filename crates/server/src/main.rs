//! shelfsync state server binary.

use anyhow::{Context, Result};
use clap::Parser;
use shelfsync_server::{router, ServerConfig, ServerContext};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "shelfsyncd")]
#[command(about = "Local file state server for the shelfsync library catalog")]
#[command(version)]
struct Cli {
    /// Path to the configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Interface to bind, overriding the configuration
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding the configuration
    #[arg(short, long)]
    port: Option<u16>,

    /// Skip the git commit on state saves
    #[arg(long)]
    no_git: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::load_from_path(path)?,
        None => ServerConfig::load()?,
    };
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if cli.no_git {
        config.git_commits = false;
    }

    let context = ServerContext::new(&config)
        .await
        .context("Failed to initialize server context")?;
    let app = router(Arc::new(context));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("state server listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
