// Diagnostics for gitfame
//
// Log records go to stderr and optionally to a log file, each with its own
// level. Standard output is reserved for the rendered report.
//
// Text lines look like `2026-01-31 09:15:02 [WARN] message`; JSON lines carry
// the same three fields as an object.

use log::{Level, LevelFilter};
use serde::{Deserialize, Serialize};
use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: {}. Valid options: text, json", s)),
        }
    }
}

/// Log destination options
#[derive(Debug, Clone, PartialEq)]
pub enum LogDestination {
    Console,
    Both(PathBuf),
}

/// JSON log entry structure
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonLogEntry {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub console_level: LevelFilter,
    pub file_level: Option<LevelFilter>,
    pub format: LogFormat,
    pub destination: LogDestination,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_level: LevelFilter::Info,
            file_level: None,
            format: LogFormat::Text,
            destination: LogDestination::Console,
        }
    }
}

impl LogConfig {
    /// Most verbose level any destination accepts
    pub fn max_level(&self) -> LevelFilter {
        match self.file_level {
            Some(file_level) if file_level > self.console_level => file_level,
            _ => self.console_level,
        }
    }
}

/// Logger writing to stderr and an optional append-only file
pub struct FameLogger {
    config: LogConfig,
}

impl FameLogger {
    pub fn new(config: LogConfig) -> Self {
        Self { config }
    }

    fn format_timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    fn format_text_message(&self, level: Level, message: &str) -> String {
        format!("{} [{}] {}", Self::format_timestamp(), level.as_str(), message)
    }

    fn format_json_message(&self, level: Level, message: &str) -> Result<String> {
        let entry = JsonLogEntry {
            timestamp: Self::format_timestamp(),
            level: level.as_str().to_string(),
            message: message.to_string(),
        };

        serde_json::to_string(&entry).context("Failed to serialize log entry to JSON")
    }

    fn format_message(&self, level: Level, message: &str) -> String {
        match self.config.format {
            LogFormat::Text => self.format_text_message(level, message),
            LogFormat::Json => self
                .format_json_message(level, message)
                .unwrap_or_else(|_| self.format_text_message(level, message)),
        }
    }

    fn should_log_to_console(&self, level: Level) -> bool {
        level <= self.config.console_level
    }

    fn should_log_to_file(&self, level: Level) -> bool {
        self.config.file_level.map_or(false, |file_level| level <= file_level)
    }

    fn write_to_file(formatted_message: &str, file_path: &Path) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(file_path)
            .with_context(|| format!("Failed to open log file: {}", file_path.display()))?;

        writeln!(file, "{}", formatted_message).context("Failed to write to log file")
    }
}

impl log::Log for FameLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.should_log_to_console(metadata.level()) || self.should_log_to_file(metadata.level())
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = record.level();
        let formatted_message = self.format_message(level, &record.args().to_string());

        if self.should_log_to_console(level) {
            // Nowhere left to report a failing stderr
            let _ = writeln!(io::stderr(), "{}", formatted_message);
        }

        if let LogDestination::Both(path) = &self.config.destination {
            if self.should_log_to_file(level) {
                if let Err(e) = Self::write_to_file(&formatted_message, path) {
                    let _ = writeln!(io::stderr(), "File logging error: {:#}", e);
                }
            }
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logger(config: LogConfig) -> Result<()> {
    let max_level = config.max_level();

    log::set_boxed_logger(Box::new(FameLogger::new(config)))
        .context("Failed to set global logger")?;
    log::set_max_level(max_level);

    Ok(())
}

/// Convert string to LevelFilter
pub fn parse_log_level(level_str: &str) -> Result<LevelFilter> {
    match level_str.to_lowercase().as_str() {
        "error" => Ok(LevelFilter::Error),
        "warn" => Ok(LevelFilter::Warn),
        "info" => Ok(LevelFilter::Info),
        "debug" => Ok(LevelFilter::Debug),
        "trace" => Ok(LevelFilter::Trace),
        "off" => Ok(LevelFilter::Off),
        _ => Err(anyhow::anyhow!("Invalid log level: {}. Valid levels: error, warn, info, debug, trace, off", level_str)),
    }
}
