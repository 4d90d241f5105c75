use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use grocery_server::config::Cli;
use grocery_server::file_store::FileStore;
use grocery_server::suggest::SuggestionClient;
use grocery_server::{logging, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init()?;

    let suggester = match cli.suggest_config() {
        Some(config) => {
            info!(
                "Suggestions enabled ({} via {})",
                config.chat_model, config.base_url
            );
            Some(SuggestionClient::new(config)?)
        }
        None => {
            warn!("OPENAI_API_KEY not set; suggestion endpoints will answer 503");
            None
        }
    };

    let state = Arc::new(AppState {
        items: FileStore::new(&cli.items_path),
        save_path: cli.save_path.clone(),
        suggester,
    });

    if !cli.dist_dir.join("index.html").is_file() {
        warn!(
            "No index.html in {}; only the API will be useful",
            cli.dist_dir.display()
        );
    }

    let app = router(state, &cli.dist_dir);

    let addr = cli.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server running on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
