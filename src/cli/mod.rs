//! CLI module containing argument parsing and related functionality

pub mod args;
pub mod enhanced_parser;
pub mod converter;

pub use args::Args;
pub use converter::{args_to_fame_config, CliError};
