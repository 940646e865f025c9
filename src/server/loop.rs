// Server loop module
// Accepts connections until shutdown, then drains open connections

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL: Duration = Duration::from_millis(50);

/// Run the accept loop on `listener` until shutdown is requested.
///
/// After the loop stops, waits up to `performance.shutdown_grace` seconds for
/// active connections to finish and returns how many were still open.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>) -> usize {
    let mut shutdown = state.shutdown.subscribe();

    while !state.is_shutting_down() {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }
            _ = shutdown.changed() => {}
        }
    }

    // Stop accepting before draining
    drop(listener);
    logger::log_info("Shutdown requested, no longer accepting connections");

    let grace = Duration::from_secs(state.config.performance.shutdown_grace);
    let remaining = drain_connections(&state, grace).await;
    if remaining == 0 {
        logger::log_info("All connections closed");
    } else {
        logger::log_warning(&format!(
            "{remaining} connection(s) still open after {}s grace period",
            grace.as_secs()
        ));
    }
    remaining
}

/// Poll the connection counter until it reaches zero or `grace` elapses
async fn drain_connections(state: &AppState, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let active = state.active_connections.load(Ordering::SeqCst);
        if active == 0 || tokio::time::Instant::now() >= deadline {
            return active;
        }
        tokio::time::sleep(DRAIN_POLL).await;
    }
}
