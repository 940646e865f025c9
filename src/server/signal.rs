// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)
// - SIGHUP:  Drop cached templates so edits are picked up
// - SIGUSR1: Reopen log files (log rotation)

use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// Start signal handlers (Unix only)
///
/// Handlers are registered before returning so a failure surfaces at startup;
/// the listening itself runs in a background task.
///
/// | Signal  | Action                 |
/// |---------|------------------------|
/// | SIGTERM | Graceful stop          |
/// | SIGINT  | Graceful stop          |
/// | SIGHUP  | Reload templates       |
/// | SIGUSR1 | Reopen log files       |
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<AppState>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigusr1 = signal(SignalKind::user_defined1())?;

    logger::log_debug(&format!(
        "[SIGNAL] Handlers registered (pid {}): SIGTERM/SIGINT stop, SIGHUP reload templates, SIGUSR1 reopen logs",
        std::process::id()
    ));

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    logger::log_info("[SIGNAL] SIGHUP received, reloading templates");
                    state.templates.reload();
                }
                _ = sigterm.recv() => {
                    logger::log_info("[SIGNAL] SIGTERM received, shutting down");
                    state.request_shutdown();
                    break;
                }
                _ = sigint.recv() => {
                    logger::log_info("[SIGNAL] SIGINT received, shutting down");
                    state.request_shutdown();
                    break;
                }
                _ = sigusr1.recv() => {
                    logger::log_info("[SIGNAL] SIGUSR1 received, reopening log files");
                    logger::reopen();
                }
            }
        }
    });

    Ok(())
}

/// Non-unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(state: Arc<AppState>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_info("[SIGNAL] Ctrl+C received, shutting down");
            state.request_shutdown();
        }
    });
    Ok(())
}
