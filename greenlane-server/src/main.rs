//! GreenLane server: local sustainability analysis over HTTP

use anyhow::{Context, Result};
use clap::Parser;
use greenlane_server::{load_engine, router, AppState, Args};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let config = args.resolve(&cwd)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_filter)),
        )
        .init();

    let engine = load_engine(&config);

    tracing::info!(
        port = config.port,
        model = %engine.model_name(),
        backend = %engine.backend_kind(),
        memory_mb = engine.memory_mb(),
        model_loaded = engine.is_loaded(),
        "GreenLane server starting"
    );

    let state = AppState::new(Arc::new(engine));
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("goodbye");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM; in-flight requests drain afterwards
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
