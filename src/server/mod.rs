//! HTTP API
//!
//! A thin JSON layer over the extraction pipeline and the product store.
//! Every extraction runs under the configured request deadline; when it
//! expires the pipeline is cancelled rather than left running in the
//! background.

mod error;
mod handlers;

pub use error::ApiError;

use crate::config::Config;
use crate::pipeline::Scraper;
use crate::store::{MemoryStore, ProductStore};
use axum::routing::{delete, get};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub scraper: Scraper,
    pub store: Arc<dyn ProductStore>,
    pub request_deadline: Duration,
}

impl AppState {
    /// Builds the state for a configuration, with an empty in-memory store
    pub fn new(scraper: Scraper, config: &Config) -> Self {
        let store = MemoryStore::new(config.server.store_capacity);
        tracing::debug!(capacity = store.capacity(), "product store ready");

        Self {
            scraper,
            store: Arc::new(store),
            request_deadline: Duration::from_secs(config.server.request_deadline_secs),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route(
            "/api/fetch-image",
            get(handlers::fetch_image_get).post(handlers::fetch_image_post),
        )
        .route(
            "/api/products",
            get(handlers::list_products).post(handlers::add_product),
        )
        .route("/api/products/{id}", delete(handlers::delete_product))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API on `addr` until Ctrl-C or SIGTERM
pub async fn serve(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, build_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
