use clap::Parser;
use repo_helper::config::{Cli, Settings};
use repo_helper::coordinator::Coordinator;
use repo_helper::indexer::CommandIndexer;
use repo_helper::ingestion::handlers::router;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli)?;

    tracing_subscriber::fmt()
        .with_max_level(settings.log_level()?)
        .init();

    tracing::info!("Repository root: {}", settings.repo.top_dir.display());
    tracing::info!(
        "Indexer: {} {}",
        settings.index_updater.executable.display(),
        settings.index_updater.cmdline
    );

    // 1. Rebuild coordinator (debounce gate + update worker):
    let coordinator = Coordinator::new(settings.coordinator());
    let indexer = Arc::new(CommandIndexer::new(
        settings.index_updater.executable.clone(),
        settings.index_updater.cmdline.clone(),
    ));
    let background = coordinator.start(indexer);

    // 2. HTTP Router:
    let app = router(
        coordinator.clone(),
        Arc::new(settings.ingest()),
        &settings.server.prefix_url,
    );

    // 3. Start HTTP server:
    let bind_addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("HTTP server listening on {}", bind_addr);
    tracing::info!("Press Ctrl+C to shutdown");

    let stop = background.token();
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(stop.clone()))
        .await;

    // 4. Stop background tasks, even if the server failed:
    stop.cancel();
    if let Err(e) = background.shutdown(settings.shutdown_grace()).await {
        tracing::error!("Unclean coordinator shutdown: {}", e);
    }

    served?;
    Ok(())
}

/// Resolves on Ctrl+C, SIGTERM, or when the coordinator is stopped elsewhere.
async fn shutdown_signal(stop: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C"),
        _ = terminate => tracing::info!("Received SIGTERM"),
        _ = stop.cancelled() => {}
    }
}
