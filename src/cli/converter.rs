//! CLI Argument Converter
//!
//! Merges parsed CLI arguments with `[fame]` configuration defaults into the
//! settings for one run. Command line values win over the configuration file.

use crate::blame::AttributionMode;
use crate::cli::enhanced_parser::EnhancedParser;
use crate::cli::Args;
use crate::config::{ConfigManager, FameConfig, FameDefaults};
use crate::engine::FailurePolicy;
use crate::output::OutputFormat;
use crate::ranking::SortKey;
use std::path::PathBuf;
use thiserror::Error;

/// CLI conversion errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{message}")]
    InvalidOrderBy { message: String },

    #[error("{message}")]
    InvalidFormat { message: String },

    #[error("Invalid thread count: {threads} must be greater than 0")]
    InvalidThreads { threads: usize },

    #[error("Empty revision provided")]
    EmptyRevision,

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Convert CLI arguments to FameConfig with ConfigManager integration
pub fn args_to_fame_config(args: &Args, config_manager: Option<&ConfigManager>) -> Result<FameConfig, CliError> {
    let defaults = match config_manager {
        Some(manager) => manager
            .get_fame_defaults()
            .map_err(|e| CliError::Config { message: format!("{:#}", e) })?,
        None => FameDefaults::default(),
    };

    let fallback = FameConfig::default();

    let revision = match args.revision.clone().or(defaults.revision) {
        Some(revision) if revision.trim().is_empty() => return Err(CliError::EmptyRevision),
        Some(revision) => revision,
        None => fallback.revision,
    };

    let order_by = match &args.order_by {
        Some(key) => key
            .parse::<SortKey>()
            .map_err(|message| CliError::InvalidOrderBy { message })?,
        None => defaults.order_by.unwrap_or(fallback.order_by),
    };

    let format = match &args.format {
        Some(format) => format
            .parse::<OutputFormat>()
            .map_err(|message| CliError::InvalidFormat { message })?,
        None => defaults.format.unwrap_or(fallback.format),
    };

    let threads = match args.threads.or(defaults.threads) {
        Some(0) => return Err(CliError::InvalidThreads { threads: 0 }),
        other => other,
    };

    let use_committer = args.use_committer || defaults.use_committer.unwrap_or(false);
    let skip_errors = args.skip_errors || defaults.skip_errors.unwrap_or(false);

    Ok(FameConfig {
        repository: PathBuf::from(&args.repository),
        revision,
        order_by,
        format,
        mode: AttributionMode::from_use_committer(use_committer),
        extensions: EnhancedParser::parse_extensions(prefer_cli(&args.extensions, defaults.extensions)),
        languages: prefer_cli(&args.languages, defaults.languages),
        exclude: prefer_cli(&args.exclude, defaults.exclude),
        restrict_to: prefer_cli(&args.restrict_to, defaults.restrict_to),
        threads,
        failure_policy: FailurePolicy::from_skip_errors(skip_errors),
    })
}

/// A list given on the command line replaces the configured one
fn prefer_cli(cli: &[String], configured: Vec<String>) -> Vec<String> {
    if cli.is_empty() {
        configured
    } else {
        cli.to_vec()
    }
}
