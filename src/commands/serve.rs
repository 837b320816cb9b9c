use crate::commands::Out;
use crate::{web, Config, Result};
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

/// Runs the web service until Ctrl-C is received.
pub async fn serve(config: Config) -> Result<Out<()>> {
    let listener = TcpListener::bind((config.host(), config.port()))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host(), config.port()))?;
    let addr = listener
        .local_addr()
        .context("Failed to read the local address")?;

    info!("Uploads are saved to {}", config.uploads().display());
    info!("Downloads are served from {}", config.downloads().display());
    info!("Starting server on http://{addr}");

    axum::serve(listener, web::router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("The server stopped unexpectedly")?;

    Ok(Out::new_message("Server stopped"))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Unable to listen for the shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
