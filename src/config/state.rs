// Application state module
// Shared read-only state handed to every connection

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::watch;

use super::types::Config;
use crate::templates::TemplateEngine;

/// Application state
pub struct AppState {
    pub config: Config,
    pub templates: TemplateEngine,
    /// Flipped to `true` once when the process should stop accepting connections
    pub shutdown: watch::Sender<bool>,
    /// Connections currently being served
    pub active_connections: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(config: &Config, templates: TemplateEngine) -> Self {
        Self {
            config: config.clone(),
            templates,
            shutdown: watch::Sender::new(false),
            active_connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Whether request-level access logging is enabled
    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }

    pub const fn debug(&self) -> bool {
        self.config.server.debug
    }

    /// Ask the accept loop and every open connection to wind down
    pub fn request_shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }
}
