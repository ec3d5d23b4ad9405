//! Listener startup and graceful shutdown
//!
//! HTTP, gRPC and (optionally) metrics listeners run concurrently and stop
//! together on Ctrl+C, SIGTERM or the first listener failure.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::BoxError;
use crate::api;
use crate::config::{Config, StoreBackend};
use crate::grpc::PvzGrpcService;
use crate::state::AppState;
use crate::store::{MemoryStore, PgStore};
use crate::telemetry::Metrics;
use crate::telemetry::metrics::metrics_router;

/// Build state for the configured backend and serve until shutdown
pub async fn run(config: Config) -> Result<(), BoxError> {
    let metrics = Arc::new(Metrics::new()?);
    let jwt = AppState::jwt_from_config(&config);

    let state = match config.store_backend {
        StoreBackend::Postgres => {
            let store = PgStore::connect(&config).await?;
            AppState::new(Arc::new(store), jwt, metrics)
        }
        StoreBackend::Memory => {
            tracing::warn!("using the in-memory store; data is lost on exit");
            AppState::new(Arc::new(MemoryStore::new()), jwt, metrics)
        }
    };

    serve(&config, state).await
}

async fn serve(config: &Config, state: AppState) -> Result<(), BoxError> {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut servers = JoinSet::new();

    // HTTP API
    let http_addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let http_listener = TcpListener::bind(http_addr).await?;
    tracing::info!("HTTP API listening on {http_addr}");
    let app = api::build_app(state.clone());
    let rx = shutdown_rx.clone();
    servers.spawn(async move {
        axum::serve(http_listener, app)
            .with_graceful_shutdown(wait_for(rx))
            .await
            .map_err(|e| BoxError::from(format!("HTTP server error: {e}")))
    });

    // gRPC API
    let grpc_addr = SocketAddr::from(([0, 0, 0, 0], config.grpc_port));
    tracing::info!("gRPC API listening on {grpc_addr}");
    let grpc = PvzGrpcService::new(state.engine.clone()).into_server();
    let rx = shutdown_rx.clone();
    servers.spawn(async move {
        tonic::transport::Server::builder()
            .add_service(grpc)
            .serve_with_shutdown(grpc_addr, wait_for(rx))
            .await
            .map_err(|e| BoxError::from(format!("gRPC server error: {e}")))
    });

    // Prometheus scrape endpoint
    if config.metrics_enabled {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
        let metrics_listener = TcpListener::bind(metrics_addr).await?;
        tracing::info!("Metrics listening on {metrics_addr}");
        let app = metrics_router(state.metrics.clone());
        let rx = shutdown_rx.clone();
        servers.spawn(async move {
            axum::serve(metrics_listener, app)
                .with_graceful_shutdown(wait_for(rx))
                .await
                .map_err(|e| BoxError::from(format!("metrics server error: {e}")))
        });
    }

    // Stop everything on a signal or as soon as any listener fails
    let signal = shutdown_signal();
    tokio::pin!(signal);
    let mut first_error = None;
    loop {
        tokio::select! {
            _ = &mut signal, if !*shutdown_tx.borrow() => {
                let _ = shutdown_tx.send(true);
            }
            joined = servers.join_next() => {
                let Some(joined) = joined else { break };
                if let Err(e) = joined.map_err(BoxError::from).and_then(|r| r) {
                    tracing::error!("{e}");
                    let _ = shutdown_tx.send(true);
                    first_error.get_or_insert(e);
                }
            }
        }
    }

    tracing::info!("Server shutdown complete");
    first_error.map_or(Ok(()), Err)
}

/// Resolves once shutdown has been requested
async fn wait_for(mut rx: watch::Receiver<bool>) {
    // a closed channel also means shutdown
    let _ = rx.wait_for(|stop| *stop).await;
}

/// Listens for SIGTERM and Ctrl+C
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
