use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Notify;

use songlib_service::{Config, SongService};

use crate::api;

/// Run the HTTP API until SIGINT or SIGTERM.
pub async fn run_serve(config: Config) -> Result<()> {
    let service = SongService::from_config(&config)?;
    service
        .prepare()
        .await
        .with_context(|| format!("Failed to open database {}", config.database_path.display()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local = listener.local_addr()?;
    log::info!(
        "Serving songs from {} on http://{local}",
        config.database_path.display()
    );
    log::info!("API docs at http://{local}{}/", api::SWAGGER_PATH);

    let stop = Arc::new(Notify::new());
    let mut server = tokio::spawn({
        let stop = Arc::clone(&stop);
        let app = api::router(service);
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move { stop.notified().await })
                .await
        }
    });

    tokio::select! {
        () = shutdown_signal() => {}
        result = &mut server => {
            result.context("Server task failed")?.context("Server error")?;
            return Ok(());
        }
    }

    let grace = config.server.shutdown_grace();
    log::info!("Shutting down, waiting up to {grace:?} for in-flight requests");
    stop.notify_one();

    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => {
            result.context("Server task failed")?.context("Server error")?;
            log::info!("Server stopped");
        }
        Err(_) => {
            log::warn!("Grace period elapsed, aborting in-flight requests");
            server.abort();
        }
    }

    Ok(())
}

/// Resolves on the first SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => log::info!("Received SIGINT"),
        () = terminate => log::info!("Received SIGTERM"),
    }
}
