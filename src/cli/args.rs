use clap::{Parser, ArgAction};
use anyhow::Result;
use std::path::PathBuf;
use log::debug;

use super::enhanced_parser::EnhancedParser;

/// Per-author line, commit and file statistics from git blame
#[derive(Parser, Debug)]
#[command(name = "gitfame")]
#[command(about = "Attribute every line at a revision to its author and rank contributors by lines, commits or files")]
#[command(version)]
pub struct Args {
    /// Path to git repository
    #[arg(short = 'r', long = "repository", alias = "repo", value_name = "PATH", default_value = ".")]
    pub repository: String,

    /// Revision whose tree is attributed [default: HEAD]
    #[arg(long, value_name = "REV")]
    pub revision: Option<String>,

    /// Primary ranking key: lines, commits or files [default: lines]
    #[arg(short = 'o', long = "order-by", value_name = "KEY")]
    pub order_by: Option<String>,

    /// Attribute lines to committers instead of authors
    #[arg(long)]
    pub use_committer: bool,

    /// Output format: tabular, csv, json or json-lines [default: tabular]
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// File extensions to keep, e.g. .go,.md - supports comma-separated values
    #[arg(long = "extensions", value_name = "EXT", action = ArgAction::Append)]
    pub extensions: Vec<String>,

    /// Languages to keep, e.g. go,markdown - supports comma-separated values
    #[arg(long = "languages", value_name = "LANG", action = ArgAction::Append)]
    pub languages: Vec<String>,

    /// Regex patterns of paths to exclude - supports comma-separated values
    #[arg(short = 'X', long = "exclude", value_name = "PATTERN", action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Regex patterns paths must match - supports comma-separated values
    #[arg(short = 'R', long = "restrict-to", value_name = "PATTERN", action = ArgAction::Append)]
    pub restrict_to: Vec<String>,

    /// Worker threads for attribution [default: one per CPU]
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Skip files whose attribution fails instead of aborting
    #[arg(long)]
    pub skip_errors: bool,

    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json [default: text]
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Configuration section name
    #[arg(long, value_name = "SECTION")]
    pub config_name: Option<String>,
}

impl Args {
    /// Apply enhanced parsing to vector fields that support comma-separated values
    pub fn apply_enhanced_parsing(mut self) -> Self {
        self.extensions = EnhancedParser::parse_extensions(self.extensions);
        self.languages = EnhancedParser::parse_languages(self.languages);
        self.exclude = EnhancedParser::parse_patterns(self.exclude);
        self.restrict_to = EnhancedParser::parse_patterns(self.restrict_to);
        self
    }
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    let args = Args::parse().apply_enhanced_parsing();
    debug!("Parsed CLI arguments with enhanced parsing: {:?}", args);
    args
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    let log_flags_count = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if log_flags_count > 1 {
        return Err(anyhow::anyhow!(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    if let Some(ref format) = args.log_format {
        match format.to_lowercase().as_str() {
            "text" | "json" => {},
            _ => return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Valid options: text, json", format
            )),
        }
    }

    if let Some(ref level) = args.log_file_level {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {},
            _ => return Err(anyhow::anyhow!(
                "Invalid log file level '{}'. Valid levels: error, warn, info, debug, trace", level
            )),
        }
    }

    if args.log_file_level.is_some() && args.log_file.is_none() {
        return Err(anyhow::anyhow!(
            "--log-file-level requires --log-file to be specified"
        ));
    }

    if args.threads == Some(0) {
        return Err(anyhow::anyhow!("--threads must be greater than 0"));
    }

    debug!("CLI arguments validated successfully");
    Ok(())
}
