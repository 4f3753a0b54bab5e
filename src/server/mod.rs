//! HTTP surface of the relay.

pub mod handlers;
pub mod wire;


use crate::relay::CompletionRelay;
use axum::routing::{get, post};
use axum::Router;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared, read-only state of every request.
pub struct AppState {
    pub relay: CompletionRelay,
    pub manifest_path: PathBuf,
}

pub fn router(state: AppState, public_dir: &Path) -> Router {
    let app = Router::new()
        .route("/", get(handlers::root))
        .route(handlers::HEALTH_PATH, get(handlers::health))
        .route(handlers::GENERATE_PATH, post(handlers::generate))
        .route("/manifest.xml", get(handlers::manifest))
        .route("/favicon.ico", get(handlers::favicon))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(Arc::new(state));
    with_layers(app)
}

/// Middleware applied to every route.
fn with_layers(app: Router) -> Router {
    app.layer(CatchPanicLayer::custom(handlers::panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serves `app` until Ctrl-C.
pub async fn serve(listener: TcpListener, app: Router) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
