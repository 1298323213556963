//! HTTP API server.
//!
//! The dashboard delivers its notifications here. Built on Axum; all
//! endpoints live under `/api/v1`.

pub mod v1;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::error::Result;
use crate::tracing::prelude::*;

pub use v1::AppState;

/// Build the complete router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", v1::routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Serve the API on `listen` until `running` is cancelled.
pub async fn serve(listen: &str, state: AppState, running: CancellationToken) -> Result<()> {
    let listener = TcpListener::bind(listen).await?;
    serve_listener(listener, state, running).await
}

/// Serve the API on an already bound listener until `running` is cancelled.
pub async fn serve_listener(
    listener: TcpListener,
    state: AppState,
    running: CancellationToken,
) -> Result<()> {
    info!(address = %listener.local_addr()?, "API listening.");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(running.cancelled_owned())
        .await?;

    trace!("API stopped.");
    Ok(())
}
