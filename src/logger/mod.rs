//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Leveled info/debug/warning/error messages
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use crate::error::StartupError;
use std::net::SocketAddr;
use std::str::FromStr;

/// Log verbosity, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" | "trace" => Ok(Self::Debug),
            other => Err(format!("Unknown log level: '{other}'")),
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup. An unknown
/// `logging.level` is rejected before any log file is opened.
pub fn init(config: &Config) -> Result<(), StartupError> {
    let level = config
        .logging
        .level
        .parse::<Level>()
        .map_err(StartupError::LogLevel)?;
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
    .map_err(StartupError::Logging)
}

fn enabled_at(level: Level, threshold: Level) -> bool {
    level <= threshold
}

fn enabled(level: Level) -> bool {
    enabled_at(level, writer::get().map_or(Level::Info, writer::LogWriter::level))
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("localstore-web started");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!(
        "Debug mode: {}",
        if config.server.debug { "on (templates auto-reload)" } else { "off" }
    ));
    write_info(&format!("Templates: {}/{}", config.templates.dir, config.templates.index));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("Routes:");
    for (path, _) in crate::handler::ROUTES {
        write_info(&format!("  - GET http://{addr}{path}"));
    }
    write_info("======================================\n");
}

pub fn log_info(message: &str) {
    if enabled(Level::Info) {
        write_info(&format!("[INFO] {message}"));
    }
}

pub fn log_debug(message: &str) {
    if enabled(Level::Debug) {
        write_info(&format!("[DEBUG] {message}"));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    if enabled(Level::Warn) {
        write_error(&format!("[WARN] {message}"));
    }
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

/// Reopen log files after rotation
pub fn reopen() {
    if let Some(w) = writer::get() {
        match w.reopen() {
            Ok(()) => log_info("Log files reopened"),
            Err(e) => log_error(&format!("Failed to reopen log files: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!("info".parse::<Level>().unwrap(), Level::Info);
        assert_eq!("WARN".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("warning".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("debug".parse::<Level>().unwrap(), Level::Debug);
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Info < Level::Debug);
    }

    #[test]
    fn test_level_filtering() {
        assert!(!enabled_at(Level::Debug, Level::Info));
        assert!(enabled_at(Level::Info, Level::Info));
        assert!(enabled_at(Level::Warn, Level::Info));
        assert!(enabled_at(Level::Error, Level::Error));
        assert!(!enabled_at(Level::Warn, Level::Error));
        assert!(enabled_at(Level::Debug, Level::Debug));
    }

    #[test]
    fn test_init_rejects_unknown_level() {
        let mut cfg = Config::load_from("__no_such_config_file__", &Default::default()).unwrap();
        cfg.logging.level = "loud".to_string();
        let err = init(&cfg).unwrap_err();
        assert!(matches!(err, StartupError::LogLevel(ref msg) if msg.contains("loud")));
    }
}
