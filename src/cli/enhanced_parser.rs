//! Expansion of list arguments given as repeated flags or comma-separated values

/// Parse a vector of strings that may contain comma-separated values
///
/// Items are split on commas and trimmed; empty items are dropped.
///
/// # Examples
///
/// ```
/// use gitfame::cli::enhanced_parser::parse_comma_separated;
///
/// // Repeated flags: --extensions .go --extensions .md
/// let input = vec![".go".to_string(), ".md".to_string()];
/// assert_eq!(parse_comma_separated(input), vec![".go", ".md"]);
///
/// // Mixed: --extensions ".go,.md" --extensions .rs
/// let input = vec![".go,.md".to_string(), ".rs".to_string()];
/// assert_eq!(parse_comma_separated(input), vec![".go", ".md", ".rs"]);
/// ```
pub fn parse_comma_separated(values: Vec<String>) -> Vec<String> {
    values
        .into_iter()
        .flat_map(|item| {
            item.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<String>>()
        })
        .collect()
}

/// Field-specific list parsing for CLI arguments
pub struct EnhancedParser;

impl EnhancedParser {
    /// Parse extension arguments, adding the leading dot where it was omitted
    pub fn parse_extensions(extensions: Vec<String>) -> Vec<String> {
        parse_comma_separated(extensions)
            .into_iter()
            .map(|ext| if ext.starts_with('.') { ext } else { format!(".{}", ext) })
            .collect()
    }

    /// Parse language name arguments
    pub fn parse_languages(languages: Vec<String>) -> Vec<String> {
        parse_comma_separated(languages)
    }

    /// Parse exclude/restrict-to pattern arguments
    pub fn parse_patterns(patterns: Vec<String>) -> Vec<String> {
        parse_comma_separated(patterns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_separated_single_values() {
        let input = vec!["go".to_string(), "rust".to_string()];
        assert_eq!(parse_comma_separated(input), vec!["go", "rust"]);
    }

    #[test]
    fn test_parse_comma_separated_with_spaces_and_empties() {
        let input = vec![" go , ,rust ".to_string(), "".to_string(), "markdown".to_string()];
        assert_eq!(parse_comma_separated(input), vec!["go", "rust", "markdown"]);
    }

    #[test]
    fn test_parse_extensions_adds_dot() {
        let input = vec!["go,.md".to_string()];
        assert_eq!(EnhancedParser::parse_extensions(input), vec![".go", ".md"]);
    }

    #[test]
    fn test_parse_patterns_keeps_regex_text() {
        let input = vec!["^vendor/,_test\\.go$".to_string()];
        assert_eq!(EnhancedParser::parse_patterns(input), vec!["^vendor/", "_test\\.go$"]);
    }
}
