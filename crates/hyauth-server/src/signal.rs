//! Process signal handling.

#[cfg(unix)]
use hyauth_auth::RefreshTrigger;
#[cfg(unix)]
use tokio_util::sync::CancellationToken;
#[cfg(unix)]
use tracing::info;
use tracing::warn;

/// Wait for shutdown signals (SIGTERM, SIGINT).
pub(crate) async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to listen for Ctrl+C: {}", e);
            // Fall back to waiting forever
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

/// Force an account refresh on every SIGHUP until `cancel` fires (Unix only).
#[cfg(unix)]
pub(crate) fn spawn_reload_handler(trigger: RefreshTrigger, cancel: CancellationToken) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sighup = match signal(SignalKind::hangup()) {
        Ok(sig) => sig,
        Err(e) => {
            warn!("failed to install SIGHUP handler: {}, manual refresh disabled", e);
            return;
        }
    };

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                received = sighup.recv() => {
                    if received.is_none() {
                        return;
                    }
                    info!("SIGHUP received, refreshing accounts");
                    trigger.fire();
                }
            }
        }
    });
}
