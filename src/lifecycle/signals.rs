//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl+C) or, on Unix, SIGTERM
//! - Translate the first signal into a shutdown trigger

use crate::lifecycle::Shutdown;

/// Resolve with the signal's name when the process is asked to stop.
#[cfg(unix)]
pub async fn wait_for_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.map(|_| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
pub async fn wait_for_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|_| "Ctrl+C")
}

/// Trigger `shutdown` on the first signal.
pub async fn shutdown_on_signal(shutdown: &Shutdown) {
    match wait_for_signal().await {
        Ok(name) => tracing::info!(signal = name, "Signal received, shutting down"),
        Err(e) => tracing::error!(error = %e, "Failed to listen for signals, shutting down"),
    }
    shutdown.trigger();
}
