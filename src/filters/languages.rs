//! Embedded language table mapping language names to file extensions

use anyhow::{Context, Result};
use serde::Deserialize;

const LANGUAGE_TABLE: &str = include_str!("languages.json");

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Language {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub extensions: Vec<String>,
}

/// Load the embedded language table
pub fn language_table() -> Result<Vec<Language>> {
    serde_json::from_str(LANGUAGE_TABLE).context("Failed to parse embedded language table")
}

/// Extensions of every language whose name matches one of `names`, case-insensitively
///
/// Names with no matching language contribute nothing.
pub fn extensions_for(names: &[String]) -> Result<Vec<String>> {
    let table = language_table()?;
    let mut extensions = Vec::new();

    for name in names {
        let matched: Vec<&Language> = table.iter().filter(|lang| lang.name.eq_ignore_ascii_case(name)).collect();
        if matched.is_empty() {
            log::warn!("Unknown language '{}' selects no files", name);
        }
        for lang in matched {
            extensions.extend(lang.extensions.iter().cloned());
        }
    }

    Ok(extensions)
}
