//! Utility functions.

use serde_json::Value;
use tracing::info;

/// Check that every required field is present in a JSON object.
///
/// Returns the missing field names. A non-object value is missing all of
/// them.
pub fn validate_required_fields(data: &Value, required: &[&str]) -> Result<(), Vec<String>> {
    let missing: Vec<String> = match data.as_object() {
        Some(object) => required
            .iter()
            .filter(|field| !object.contains_key(**field))
            .map(|field| field.to_string())
            .collect(),
        None => required.iter().map(|field| field.to_string()).collect(),
    };

    if missing.is_empty() {
        Ok(())
    } else {
        Err(missing)
    }
}

/// Trim surrounding whitespace and optionally truncate to `max_len` characters.
pub fn sanitize_string(value: &str, max_len: Option<usize>) -> String {
    let trimmed = value.trim();
    match max_len {
        Some(max) if trimmed.chars().count() > max => trimmed.chars().take(max).collect(),
        _ => trimmed.to_string(),
    }
}

/// Resolve when the process receives Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", e);
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
                tracing::error!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received ctrl-c, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
