//! Output formatting
//!
//! Projects ranked author records onto `Name, Lines, Commits, Files` rows in
//! one of four formats. Nothing here changes or re-sorts the data.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use prettytable::format::FormatBuilder;
use prettytable::{Cell, Row, Table};
use serde::Serialize;

use crate::authors::AuthorRecord;

const HEADERS: [&str; 4] = ["Name", "Lines", "Commits", "Files"];

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Tabular,
    Csv,
    Json,
    JsonLines,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tabular" => Ok(OutputFormat::Tabular),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "json-lines" => Ok(OutputFormat::JsonLines),
            _ => Err(format!(
                "Invalid output format: {}. Valid options: tabular, csv, json, json-lines",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Tabular => "tabular",
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::JsonLines => "json-lines",
        };
        write!(f, "{}", name)
    }
}

/// Serialised shape of one author
#[derive(Debug, Serialize)]
struct AuthorRow<'a> {
    name: &'a str,
    lines: usize,
    commits: usize,
    files: usize,
}

impl<'a> From<&'a AuthorRecord> for AuthorRow<'a> {
    fn from(author: &'a AuthorRecord) -> Self {
        Self {
            name: &author.name,
            lines: author.line_count,
            commits: author.commit_count,
            files: author.file_count(),
        }
    }
}

/// Render `authors` in the requested format, preserving their order
pub fn render(authors: &[&AuthorRecord], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Tabular => Ok(render_tabular(authors)),
        OutputFormat::Csv => Ok(render_csv(authors)),
        OutputFormat::Json => render_json(authors),
        OutputFormat::JsonLines => render_json_lines(authors),
    }
}

/// Space-aligned table with a header row
pub fn render_tabular(authors: &[&AuthorRecord]) -> String {
    let mut table = Table::new();
    table.set_format(FormatBuilder::new().column_separator(' ').padding(0, 0).build());
    table.set_titles(Row::new(HEADERS.iter().map(|h| Cell::new(h)).collect()));

    for author in authors {
        table.add_row(Row::new(vec![
            Cell::new(&author.name),
            Cell::new(&author.line_count.to_string()),
            Cell::new(&author.commit_count.to_string()),
            Cell::new(&author.file_count().to_string()),
        ]));
    }

    table
        .to_string()
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Comma separated values with a header line, no trailing newline
pub fn render_csv(authors: &[&AuthorRecord]) -> String {
    let mut lines = Vec::with_capacity(authors.len() + 1);
    lines.push(HEADERS.join(","));

    for author in authors {
        lines.push(format!(
            "{},{},{},{}",
            escape_csv_field(&author.name),
            author.line_count,
            author.commit_count,
            author.file_count()
        ));
    }

    lines.join("\n")
}

/// Quote a field if it contains a delimiter, quote or line break, or starts with whitespace
fn escape_csv_field(field: &str) -> String {
    let needs_quotes = field.contains([',', '"', '\n', '\r']) || field.starts_with(char::is_whitespace);
    if needs_quotes {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Compact JSON array of author objects
pub fn render_json(authors: &[&AuthorRecord]) -> Result<String> {
    let rows: Vec<AuthorRow<'_>> = authors.iter().map(|a| AuthorRow::from(*a)).collect();
    serde_json::to_string(&rows).context("Failed to serialise authors to JSON")
}

/// One JSON object per line, each line newline-terminated
pub fn render_json_lines(authors: &[&AuthorRecord]) -> Result<String> {
    let mut output = String::new();
    for author in authors {
        let line = serde_json::to_string(&AuthorRow::from(*author))
            .with_context(|| format!("Failed to serialise author '{}' to JSON", author.name))?;
        output.push_str(&line);
        output.push('\n');
    }
    Ok(output)
}
