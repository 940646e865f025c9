use thiserror::Error;

/// Everything that can stop the server from coming up
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    Address(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid logging.level: {0}")]
    LogLevel(String),

    #[error("Failed to initialize logging: {0}")]
    Logging(#[source] std::io::Error),

    #[error("Failed to build runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Failed to register signal handlers: {0}")]
    Signals(#[source] std::io::Error),
}
