//! XSLGPT: natural-language prompts in, spreadsheet formulas out.
//!
//! The relay half ([`relay`], [`server`]) turns a prompt into a formula via an
//! OpenAI-compatible completion service. The panel half ([`panel`],
//! [`history`]) drives the add-in side: submit, show, remember, insert.

pub mod config;
pub mod formula;
pub mod history;
pub mod llm;
pub mod panel;
pub mod relay;
pub mod server;

use crate::config::Config;
use crate::relay::CompletionRelay;
use crate::server::{handlers, router, AppState};
use anyhow::Context;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "xslgpt=info,xslgpt_lib=info,tower_http=info";

/// Installs the global subscriber. `RUST_LOG` wins over the built-in filter.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A second call (e.g. from tests) leaves the first subscriber in place.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Loads configuration, binds the listener and serves until Ctrl-C.
pub async fn run() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::load().context("Failed to load configuration")?;
    if !config.is_configured() {
        warn!("OPENAI_API_KEY is not set; /api/generate will answer 500 until it is");
    }

    let relay = CompletionRelay::from_config(&config).context("Failed to build completion client")?;
    let state = AppState {
        relay,
        manifest_path: config.server.manifest_path.clone(),
    };
    let app = router(state, &config.server.public_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("XSLGPT server running on port {}", config.server.port);
    info!(
        "Health check: http://localhost:{}{}",
        config.server.port,
        handlers::HEALTH_PATH
    );
    info!(
        "API endpoint: http://localhost:{}{}",
        config.server.port,
        handlers::GENERATE_PATH
    );

    server::serve(listener, app).await.context("Server error")?;
    info!("Server stopped");
    Ok(())
}
