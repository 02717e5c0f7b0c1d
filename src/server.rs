//! Binding and serving the application.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

use crate::api::{create_router, AppState};
use crate::config::Settings;
use crate::error::{Result, ServerError};
use crate::metrics;
use crate::utils::shutdown_signal;

/// Resolve the bind address from settings.
pub fn bind_addr(settings: &Settings) -> Result<SocketAddr> {
    let raw = format!("{}:{}", settings.host, settings.port);
    raw.parse()
        .map_err(|_| ServerError::InvalidAddress(raw))
}

/// Build the application and serve it until Ctrl-C or SIGTERM.
pub async fn run(settings: Settings, enable_metrics: bool) -> Result<()> {
    let addr = bind_addr(&settings)?;

    let mut state = AppState::new(settings);
    if enable_metrics {
        let handle =
            metrics::install_exporter().map_err(|e| ServerError::Metrics(e.to_string()))?;
        state = state.with_metrics(handle);
        info!("Prometheus metrics enabled at /metrics");
    }

    let router = create_router(state)?;

    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    Ok(())
}
