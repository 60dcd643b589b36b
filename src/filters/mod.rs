//! File Filtering
//!
//! Narrows the tracked-file list before attribution: exclude patterns first,
//! then extension/language suffixes, then restrict-to patterns. Patterns are
//! unanchored regular expressions; a pattern that fails to compile is matched
//! as a literal string.

pub mod languages;

use anyhow::Result;
use log::debug;
use regex::Regex;

pub use languages::{extensions_for, language_table, Language};

/// Compiled filtering rules
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    exclude: Vec<Regex>,
    /// Set when extensions or languages were requested, even if none resolved
    restrict_suffix: bool,
    suffixes: Vec<String>,
    restrict_to: Vec<Regex>,
}

impl FileFilter {
    /// Build a filter from raw pattern lists
    ///
    /// `extensions` and `languages` together form the suffix allow-list.
    pub fn new(
        exclude: &[String],
        extensions: &[String],
        languages: &[String],
        restrict_to: &[String],
    ) -> Result<Self> {
        let mut suffixes: Vec<String> = extensions.to_vec();
        suffixes.extend(extensions_for(languages)?);

        Ok(Self {
            exclude: compile_patterns(exclude)?,
            restrict_suffix: !extensions.is_empty() || !languages.is_empty(),
            suffixes,
            restrict_to: compile_patterns(restrict_to)?,
        })
    }

    /// Whether `file` survives every rule
    pub fn matches(&self, file: &str) -> bool {
        if self.exclude.iter().any(|re| re.is_match(file)) {
            return false;
        }
        if self.restrict_suffix && !self.suffixes.iter().any(|s| file.ends_with(s.as_str())) {
            return false;
        }
        self.restrict_to.is_empty() || self.restrict_to.iter().any(|re| re.is_match(file))
    }

    /// Apply the rules to `files`, keeping their order
    pub fn apply(&self, files: Vec<String>) -> Vec<String> {
        let before = files.len();
        let kept: Vec<String> = files.into_iter().filter(|file| self.matches(file)).collect();

        debug!("File filter kept {} of {} files", kept.len(), before);
        kept
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| match Regex::new(pattern) {
            Ok(re) => Ok(re),
            Err(e) => {
                debug!("Pattern '{}' is not a valid regex ({}), matching literally", pattern, e);
                Ok(Regex::new(&regex::escape(pattern))?)
            }
        })
        .collect()
}
