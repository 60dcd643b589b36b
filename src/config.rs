use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use anyhow::{Context, Result};
use toml::Value;
use log::{debug, info};

use crate::blame::AttributionMode;
use crate::cli::enhanced_parser::parse_comma_separated;
use crate::engine::FailurePolicy;
use crate::output::OutputFormat;
use crate::ranking::SortKey;

/// Configuration storage - section_name -> key -> value
pub type Configuration = HashMap<String, HashMap<String, String>>;

/// Section holding defaults for the statistics run
pub const FAME_SECTION: &str = "fame";

/// Defaults for a statistics run read from the configuration file
///
/// Every field is optional; command line values take precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FameDefaults {
    pub revision: Option<String>,
    pub order_by: Option<SortKey>,
    pub format: Option<OutputFormat>,
    pub use_committer: Option<bool>,
    pub extensions: Vec<String>,
    pub languages: Vec<String>,
    pub exclude: Vec<String>,
    pub restrict_to: Vec<String>,
    pub threads: Option<usize>,
    pub skip_errors: Option<bool>,
}

/// Fully resolved settings for one statistics run
#[derive(Debug, Clone, PartialEq)]
pub struct FameConfig {
    pub repository: PathBuf,
    pub revision: String,
    pub order_by: SortKey,
    pub format: OutputFormat,
    pub mode: AttributionMode,
    pub extensions: Vec<String>,
    pub languages: Vec<String>,
    pub exclude: Vec<String>,
    pub restrict_to: Vec<String>,
    pub threads: Option<usize>,
    pub failure_policy: FailurePolicy,
}

impl Default for FameConfig {
    fn default() -> Self {
        Self {
            repository: PathBuf::from("."),
            revision: "HEAD".to_string(),
            order_by: SortKey::default(),
            format: OutputFormat::default(),
            mode: AttributionMode::default(),
            extensions: Vec::new(),
            languages: Vec::new(),
            exclude: Vec::new(),
            restrict_to: Vec::new(),
            threads: None,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Configuration manager
pub struct ConfigManager {
    config: Configuration,
    config_file_path: Option<PathBuf>,
    selected_section: Option<String>,
}

impl ConfigManager {
    /// Create a new ConfigManager from a Configuration (primarily for testing)
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config,
            config_file_path: None,
            selected_section: None,
        }
    }

    /// Load configuration using discovery hierarchy
    pub fn load() -> Result<Self> {
        debug!("Starting configuration discovery");

        for path in discover_config_files() {
            debug!("Attempting to load config from: {}", path.display());
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(path);
            }
        }

        info!("No configuration file found, using empty configuration");
        Ok(Self::from_config(Configuration::new()))
    }

    /// Load configuration from explicit file path
    pub fn load_from_file(path: PathBuf) -> Result<Self> {
        debug!("Loading configuration from file: {}", path.display());

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = parse_toml_config(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!("Successfully loaded configuration from: {}", path.display());
        Ok(Self {
            config,
            config_file_path: Some(path),
            selected_section: None,
        })
    }

    /// Path of the loaded configuration file, if any
    pub fn config_file_path(&self) -> Option<&PathBuf> {
        self.config_file_path.as_ref()
    }

    /// Get value from configuration with section fallback
    pub fn get_value(&self, section: &str, key: &str) -> Option<&String> {
        // Priority: selected_section -> specified section -> base
        if let Some(selected) = &self.selected_section {
            if let Some(value) = self.config.get(selected).and_then(|s| s.get(key)) {
                return Some(value);
            }
        }

        if let Some(value) = self.config.get(section).and_then(|s| s.get(key)) {
            return Some(value);
        }

        self.config.get("base").and_then(|s| s.get(key))
    }

    /// Select configuration section for --config-name
    pub fn select_section(&mut self, section: String) {
        debug!("Selecting configuration section: {}", section);
        self.selected_section = Some(section);
    }

    /// Get boolean value with type conversion
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        match self.get_value(section, key) {
            Some(value) => match value.to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(anyhow::anyhow!("Invalid boolean value for {}.{}: {}", section, key, value)),
            },
            None => Ok(None),
        }
    }

    /// Get log level value with type conversion
    pub fn get_log_level(&self, section: &str, key: &str) -> Result<Option<log::LevelFilter>> {
        match self.get_value(section, key) {
            Some(value) => Ok(Some(crate::logging::parse_log_level(value)?)),
            None => Ok(None),
        }
    }

    /// Get path value with type conversion
    pub fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_value(section, key).map(PathBuf::from)
    }

    /// Get a comma-separated list value
    pub fn get_list(&self, section: &str, key: &str) -> Vec<String> {
        self.get_value(section, key)
            .map(|value| parse_comma_separated(vec![value.clone()]))
            .unwrap_or_default()
    }

    /// Parse a value with its `FromStr` implementation
    fn get_parsed<T>(&self, section: &str, key: &str) -> Result<Option<T>>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_value(section, key) {
            Some(value) => value
                .parse::<T>()
                .map(Some)
                .map_err(|e| anyhow::anyhow!("Invalid value for {}.{}: {}", section, key, e)),
            None => Ok(None),
        }
    }

    /// Get run defaults from the `[fame]` section
    pub fn get_fame_defaults(&self) -> Result<FameDefaults> {
        let threads = match self.get_parsed::<usize>(FAME_SECTION, "threads")? {
            Some(0) => anyhow::bail!("Invalid value for {}.threads: must be greater than 0", FAME_SECTION),
            other => other,
        };

        let defaults = FameDefaults {
            revision: self.get_value(FAME_SECTION, "revision").cloned(),
            order_by: self.get_parsed(FAME_SECTION, "order-by")?,
            format: self.get_parsed(FAME_SECTION, "format")?,
            use_committer: self.get_bool(FAME_SECTION, "use-committer")?,
            extensions: self.get_list(FAME_SECTION, "extensions"),
            languages: self.get_list(FAME_SECTION, "languages"),
            exclude: self.get_list(FAME_SECTION, "exclude"),
            restrict_to: self.get_list(FAME_SECTION, "restrict-to"),
            threads,
            skip_errors: self.get_bool(FAME_SECTION, "skip-errors")?,
        };

        debug!("Configuration defaults: {:?}", defaults);
        Ok(defaults)
    }
}

/// Discover configuration files in order of precedence
fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Environment variable $GITFAME_CONFIG
    if let Ok(env_path) = env::var("GITFAME_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    // 2. XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("gitfame").join("config.toml"));
    }

    // 3. Home directory
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".gitfame.toml"));
    }

    // 4. Project local
    paths.push(PathBuf::from("./.gitfame.toml"));

    debug!("Config discovery paths: {:?}", paths);
    paths
}

/// Parse TOML content to string-based configuration
fn parse_toml_config(content: &str) -> Result<Configuration> {
    let toml_value: Value = content.parse()
        .context("Failed to parse TOML content")?;

    let mut config = Configuration::new();

    if let Value::Table(table) = toml_value {
        flatten_toml_table(&table, String::new(), &mut config);
    }

    debug!("Parsed configuration: {:?}", config);
    Ok(config)
}

/// Recursively flatten TOML tables into section.subsection format
fn flatten_toml_table(table: &toml::Table, prefix: String, config: &mut Configuration) {
    for (key, value) in table {
        let section_name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Table(subtable) => {
                if subtable.values().all(|v| !matches!(v, Value::Table(_))) {
                    let section_map = subtable
                        .iter()
                        .map(|(subkey, subvalue)| (subkey.clone(), toml_value_to_string(subvalue)))
                        .collect();
                    config.insert(section_name, section_map);
                } else {
                    flatten_toml_table(subtable, section_name, config);
                }
            }
            _ => {
                // Top-level key-value pair outside any table
                let mut section_map = HashMap::new();
                section_map.insert("value".to_string(), toml_value_to_string(value));
                config.insert(section_name, section_map);
            }
        }
    }
}

/// Convert TOML Value to string representation
///
/// Arrays of scalars become comma-separated lists.
fn toml_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Array(items) if items.iter().all(|v| !matches!(v, Value::Array(_) | Value::Table(_))) => {
            items.iter().map(toml_value_to_string).collect::<Vec<_>>().join(",")
        }
        Value::Array(_) | Value::Table(_) => value.to_string(),
        Value::Datetime(dt) => dt.to_string(),
    }
}
