//! HTTP/REST transport for the heatmap server.
//!
//! # Example
//!
//! ```ignore
//! use heatmap_server::transport::http::run_server;
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! run_server(listener, state, &ServerConfig::default(), shutdown).await?;
//! ```

use crate::config::ServerConfig;
use crate::handler::{self, ApiError, AppState};
use axum::error_handling::HandleErrorLayer;
use axum::routing::{get, post};
use axum::{BoxError, Router};
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::{info, warn};

/// Build the API router.
///
/// Queries run under `request_timeout`. The reload route is added after the
/// timeout layer and is not bound by it.
pub fn router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/v1/ipv6", get(handler::list_ipv6))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout))
                .timeout(request_timeout),
        )
        .route("/v1/admin/reload", post(handler::reload))
        .with_state(state)
}

async fn handle_timeout(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(format!("unhandled internal error: {}", err))
    }
}

/// Serve the API on `listener` until `shutdown` resolves.
///
/// After the shutdown signal the server stops accepting connections and gives
/// in-flight requests up to `config.shutdown_timeout` to finish.
pub async fn run_server(
    listener: TcpListener,
    state: AppState,
    config: &ServerConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = router(state, config.request_timeout);
    info!("startup : Listening @ {}", listener.local_addr()?);

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.await;
            })
            .await
    });

    tokio::select! {
        result = &mut server => {
            result??;
            return Ok(());
        }
        _ = shutdown => {
            info!("shutdown : Started");
        }
    }

    let _ = stop_tx.send(());
    match tokio::time::timeout(config.shutdown_timeout, &mut server).await {
        Ok(result) => {
            result??;
            info!("shutdown : Completed");
        }
        Err(_) => {
            warn!(
                "shutdown : In-flight requests still running after {:?}, aborting",
                config.shutdown_timeout
            );
            server.abort();
        }
    }
    Ok(())
}
