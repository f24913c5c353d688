use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_media::{
    backend::SupabaseBackend,
    catalog::filter_by_category,
    config::Config,
    content::PortfolioContent,
    routes::create_router,
    utils::init_logger,
    AppState,
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "folio-media", version, about = "Portfolio data service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Fetch the media catalog once and print it as JSON
    Fetch {
        /// Only print projects in this category
        #[arg(long, default_value = "all")]
        category: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    info!(server = ?config.server, backend = ?config.backend, "Configuration loaded");

    let backend = Arc::new(SupabaseBackend::from_config(&config.backend)?);
    let content = PortfolioContent::load(config.content.file.as_deref())
        .context("Failed to load portfolio content")?;

    let state = AppState::new(config, backend, content);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(state).await,
        Command::Fetch { category } => {
            let snapshot = state.fetcher.fetch_all().await;
            let projects = filter_by_category(&snapshot.projects, &category);
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "projects": projects,
                    "error": snapshot.error,
                    "skipped_rows": snapshot.skipped_rows,
                }))?
            );
            Ok(())
        }
    }
}

async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", state.config.server.host, state.config.server.port)
        .parse()
        .context("Invalid HOST/PORT")?;

    // Initial catalog load runs alongside the server, like a section mounting
    let loader = {
        let state = state.clone();
        tokio::spawn(async move {
            state.store.refresh(&state.fetcher).await;
        })
    };

    let store = state.store.clone();
    let app = create_router(state);

    info!("Server listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    store.shutdown().await;
    if let Err(e) = loader.await {
        error!(error = %e, "Catalog loader task failed");
    }

    result.map_err(|e| anyhow::anyhow!("Server error: {}", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}
