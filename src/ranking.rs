//! Ranking Engine
//!
//! Orders contributors by a primary key, then by the two remaining keys in a
//! fixed order, then by name. Every numeric key ranks higher totals first; the
//! name comparison is ascending.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::authors::{AuthorMap, AuthorRecord};

/// Ranking key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    #[default]
    Lines,
    Commits,
    Files,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Lines, SortKey::Commits, SortKey::Files];

    /// Key comparison order when `self` is the primary key
    pub fn precedence(self) -> [SortKey; 3] {
        match self {
            SortKey::Lines => [SortKey::Lines, SortKey::Commits, SortKey::Files],
            SortKey::Commits => [SortKey::Commits, SortKey::Lines, SortKey::Files],
            SortKey::Files => [SortKey::Files, SortKey::Lines, SortKey::Commits],
        }
    }

    fn value(self, author: &AuthorRecord) -> usize {
        match self {
            SortKey::Lines => author.line_count,
            SortKey::Commits => author.commit_count,
            SortKey::Files => author.file_count(),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lines" => Ok(SortKey::Lines),
            "commits" => Ok(SortKey::Commits),
            "files" => Ok(SortKey::Files),
            _ => Err(format!("Invalid order key: {}. Valid options: lines, commits, files", s)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Lines => "lines",
            SortKey::Commits => "commits",
            SortKey::Files => "files",
        };
        write!(f, "{}", name)
    }
}

/// Total order on authors for the given primary key
///
/// `Ordering::Less` means `a` ranks before `b`.
pub fn compare(a: &AuthorRecord, b: &AuthorRecord, key: SortKey) -> Ordering {
    key.precedence()
        .iter()
        .map(|k| k.value(b).cmp(&k.value(a)))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.name.cmp(&b.name))
}

/// Rank the authors by `key`, borrowing the records
pub fn rank(authors: &AuthorMap, key: SortKey) -> Vec<&AuthorRecord> {
    let mut ranked: Vec<&AuthorRecord> = authors.values().collect();
    ranked.sort_by(|a, b| compare(a, b, key));
    ranked
}
