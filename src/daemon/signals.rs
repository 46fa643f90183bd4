//! Bridges SIGINT/SIGTERM into the control loop's shutdown channel.

use tracing::{error, info};

use crate::control::shutdown::ShutdownHandle;

/// Spawn a task that triggers `handle` on the first SIGINT or SIGTERM.
/// The SIGTERM handler is installed before this returns.
#[cfg(unix)]
pub fn spawn_signal_listener(handle: ShutdownHandle) -> tokio::task::JoinHandle<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let sigterm = match signal(SignalKind::terminate()) {
        Ok(s) => Some(s),
        Err(e) => {
            error!("Failed to setup SIGTERM handler: {}", e);
            None
        }
    };

    tokio::spawn(async move {
        let name = match sigterm {
            Some(mut sigterm) => tokio::select! {
                name = ctrl_c() => name,
                _ = sigterm.recv() => "SIGTERM",
            },
            None => ctrl_c().await,
        };
        info!("Shutdown signal received ({})", name);
        handle.trigger();
    })
}

#[cfg(not(unix))]
pub fn spawn_signal_listener(handle: ShutdownHandle) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let name = ctrl_c().await;
        info!("Shutdown signal received ({})", name);
        handle.trigger();
    })
}

async fn ctrl_c() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    "SIGINT"
}
