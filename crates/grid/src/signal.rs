//! OS signal handling

use grid_http_server::CancellationToken;
use tracing::{error, info};

/// Cancel `cancel` when the process is asked to stop.
///
/// If the signal handlers cannot be installed the service keeps running and
/// can only be stopped by killing the process.
pub async fn cancel_on_shutdown_signal(cancel: CancellationToken) {
    match shutdown_signal().await {
        Ok(name) => {
            info!("Received {}", name);
            cancel.cancel();
        }
        Err(err) => error!("Failed to install signal handlers: {}", err),
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "Ctrl-C")
}
