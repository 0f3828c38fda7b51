//! Logger module
//!
//! Provides logging utilities for the facade and the server around it:
//! - Server lifecycle logging
//! - Outbound request timing
//! - Application, async task and uncaught error reporting
//! - File-based logging support

mod context;
pub mod writer;

pub use context::RequestLogger;

use crate::config::Config;
use chrono::Local;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Log severity, ordered from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
}

impl Level {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" | "trace" => Ok(Self::Debug),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup. An unknown level name
/// falls back to `info` with a warning.
pub fn init(config: &Config) -> std::io::Result<()> {
    let (level, warning) = resolve_level(&config.logging.level);
    writer::init(
        level,
        config.logging.info_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )?;
    if let Some(warning) = warning {
        log_warning(&warning);
    }
    Ok(())
}

/// Configured level, or `Info` and the warning to log for an unknown name
fn resolve_level(name: &str) -> (Level, Option<String>) {
    match name.parse() {
        Ok(level) => (level, None),
        Err(e) => (Level::Info, Some(format!("[Config] {e}, falling back to info"))),
    }
}

/// Format a line with timestamp and level
fn format_line(level: Level, message: &str) -> String {
    format!(
        "{} [{level}] {message}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f")
    )
}

/// Write a message at the given level
pub fn write(level: Level, message: &str) {
    let line = format_line(level, message);
    match writer::get() {
        Some(w) => w.write(level, &line),
        None => match level {
            Level::Error | Level::Warn => eprintln!("{line}"),
            Level::Info | Level::Debug => println!("{line}"),
        },
    }
}

pub fn write_info(message: &str) {
    write(Level::Info, message);
}

pub fn write_error(message: &str) {
    write(Level::Error, message);
}

pub fn log_warning(message: &str) {
    write(Level::Warn, message);
}

pub fn log_debug(message: &str) {
    write(Level::Debug, message);
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    write_info("======================================");
    write_info("SSR server started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    write_info(&format!(
        "Deploy stage: {:?} (dist env: {})",
        config.deploy.stage,
        config.deploy_env().dist_env()
    ));
    if let Some(ref target) = config.deploy.compile_target {
        write_info(&format!("Compile target: {target}"));
    }
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.info_log_file {
        write_info(&format!("Info log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================");
}

pub fn log_request_completed(method: &str, url: &str, elapsed_ms: u64) {
    log_debug(&format!("[Request] {method} {url} completed in {elapsed_ms}ms"));
}

pub fn log_request_failed(method: &str, url: &str, err: &dyn fmt::Display) {
    log_warning(&format!("[Request] {method} {url} failed: {err}"));
}

pub fn log_dir_error(path: &std::path::Path, err: &std::io::Error) {
    write_error(&format!(
        "[Dirs] Get dir names error {}: {err}",
        path.display()
    ));
}

pub fn log_app_error(err: &dyn fmt::Display) {
    write_error(&format!("[App] {err}"));
}

pub fn log_unhandled_rejection(origin: &str, reason: &str) {
    write_error(&format!("[Unhandled] {origin}: {reason}"));
}

pub fn log_uncaught(err: &str) {
    write_error(&format!("[Uncaught] {err}"));
}

pub fn log_render_fallback(url: &str, err: &dyn fmt::Display) {
    log_warning(&format!("[Render] {url} fell back to default markup: {err}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parse() {
        assert_eq!("info".parse::<Level>(), Ok(Level::Info));
        assert_eq!("WARNING".parse::<Level>(), Ok(Level::Warn));
        assert_eq!("trace".parse::<Level>(), Ok(Level::Debug));
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_resolve_level() {
        assert_eq!(resolve_level("debug"), (Level::Debug, None));

        let (level, warning) = resolve_level("verbose");
        assert_eq!(level, Level::Info);
        let warning = warning.unwrap();
        assert!(warning.contains("unknown log level 'verbose'"));
        assert!(warning.contains("falling back to info"));
    }

    #[test]
    fn test_level_order() {
        assert!(Level::Error < Level::Warn);
        assert!(Level::Info < Level::Debug);
    }

    #[test]
    fn test_format_line() {
        let line = format_line(Level::Warn, "disk almost full");
        assert!(line.ends_with("[WARN] disk almost full"));
    }
}
