// Connection handling module
// Accepts a single TCP connection and serves it on its own task

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection, enforcing the connection limit.
///
/// Returns `false` when the connection was rejected.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<AppState>,
) -> bool {
    let conn_counter = &state.active_connections;

    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return false;
        }
    }

    logger::log_connection_accepted(&peer_addr);
    // Subscribed before the spawn so a shutdown requested while the task
    // starts up is still seen.
    let shutdown = state.shutdown.subscribe();
    handle_connection(stream, peer_addr, Arc::clone(state), shutdown);
    true
}

/// Serve one connection in a spawned task.
///
/// Once the connection has been open for max(read, write) timeout it is
/// closed gracefully: an idle connection closes at once, an in-flight request
/// gets `write_timeout` more to finish before the connection is dropped.
/// A shutdown request switches to the same graceful mode.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<AppState>,
    mut shutdown: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);
        let perf = &state.config.performance;
        let lifetime = Duration::from_secs(std::cmp::max(perf.read_timeout, perf.write_timeout));
        let write_grace = Duration::from_secs(perf.write_timeout);

        let mut builder = http1::Builder::new();
        builder.keep_alive(perf.keep_alive);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, peer_addr, Arc::clone(&service_state))),
        );
        tokio::pin!(conn);

        let mut draining = *shutdown.borrow_and_update();
        if draining {
            conn.as_mut().graceful_shutdown();
        }

        let deadline = tokio::time::sleep(lifetime);
        tokio::pin!(deadline);
        let mut expired = false;

        let served = loop {
            tokio::select! {
                res = conn.as_mut() => break Some(res),
                _ = shutdown.changed(), if !draining => {
                    draining = true;
                    conn.as_mut().graceful_shutdown();
                }
                () = &mut deadline => {
                    if expired {
                        break None;
                    }
                    expired = true;
                    logger::log_debug(&format!(
                        "Connection from {peer_addr} open for {} seconds, closing",
                        lifetime.as_secs()
                    ));
                    if !draining {
                        draining = true;
                        conn.as_mut().graceful_shutdown();
                    }
                    deadline.as_mut().reset(tokio::time::Instant::now() + write_grace);
                }
            }
        };

        match served {
            Some(Ok(())) => {}
            Some(Err(err)) => logger::log_connection_error(&err),
            None => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} did not finish within {} seconds of closing, dropped",
                    write_grace.as_secs()
                ));
            }
        }

        state.active_connections.fetch_sub(1, Ordering::SeqCst);
    });
}
