//! Application initialization and configuration

use anyhow::Result;
use log::{debug, LevelFilter};
use std::str::FromStr;
use crate::{cli, config, logging};

pub fn load_configuration(args: &cli::Args) -> Result<config::ConfigManager> {
    let mut manager = if let Some(config_file) = &args.config_file {
        debug!("Loading configuration from explicit file: {}", config_file.display());
        config::ConfigManager::load_from_file(config_file.clone())?
    } else {
        config::ConfigManager::load()?
    };

    if let Some(section_name) = &args.config_name {
        manager.select_section(section_name.clone());
    }

    Ok(manager)
}

/// Build the logger configuration; flags take precedence over `[base]` keys
pub fn configure_logging(args: &cli::Args, config: &config::ConfigManager) -> Result<logging::LogConfig> {
    let console_level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        config.get_log_level("base", "console-level")?.unwrap_or(LevelFilter::Info)
    };

    let format = match args.log_format.as_deref().or_else(|| config.get_value("base", "log-format").map(String::as_str)) {
        Some(format_str) => logging::LogFormat::from_str(format_str).map_err(|e| anyhow::anyhow!(e))?,
        None => logging::LogFormat::Text,
    };

    let log_file_path = args.log_file.clone()
        .or_else(|| config.get_path("base", "log-file"));

    let file_log_level = match &args.log_file_level {
        Some(level_str) => Some(logging::parse_log_level(level_str)?),
        None => config.get_log_level("base", "file-log-level")?,
    };

    let (destination, file_level) = match (log_file_path, file_log_level) {
        (Some(file_path), level) => {
            // Without an explicit level the file mirrors the console
            let level = level.unwrap_or(console_level);
            (logging::LogDestination::Both(file_path), Some(level))
        }
        (None, None) => (logging::LogDestination::Console, None),
        (None, Some(_)) => {
            return Err(anyhow::anyhow!("Log file level specified without log file"));
        }
    };

    Ok(logging::LogConfig {
        console_level,
        file_level,
        format,
        destination,
    })
}
