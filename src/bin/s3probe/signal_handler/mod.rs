// Termination signal handling for the server binary.
//
// First signal: stop accepting connections and give in-flight requests the
// configured grace period. Second signal: close immediately.

use std::time::Duration;

use axum_server::Handle;
use tokio::select;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use s3probe_rs::ShutdownToken;

pub fn spawn_signal_handler(
    handle: Handle,
    shutdown_token: ShutdownToken,
    grace_period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        select! {
            _ = shutdown_token.cancelled() => {
                debug!("shutdown token cancelled.");
                return;
            }
            _ = terminate_signal() => {
                warn!(
                    grace_period_seconds = grace_period.as_secs(),
                    "termination signal received, shutting down..."
                );
                handle.graceful_shutdown(Some(grace_period));
            }
        }

        select! {
            _ = shutdown_token.cancelled() => {
                debug!("server stopped within the grace period.");
            }
            _ = terminate_signal() => {
                warn!("second termination signal received, killing the server.");
                handle.shutdown();
            }
        }
    })
}

// ctrl_c covers SIGINT everywhere (and console events on Windows); SIGTERM
// only exists on unix.
#[cfg(unix)]
async fn terminate_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(e) => {
            warn!("failed to install SIGTERM handler: {e}");
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use s3probe_rs::create_shutdown_token;

    #[tokio::test]
    async fn signal_handler_exits_on_token_cancellation() {
        let handle = Handle::new();
        let shutdown_token = create_shutdown_token();

        let join_handle =
            spawn_signal_handler(handle, shutdown_token.clone(), Duration::from_secs(5));
        shutdown_token.cancel();

        join_handle.await.unwrap();

        assert!(shutdown_token.is_cancelled());
    }
}
