//! Author Aggregator
//!
//! Groups the commit ledger by contributor name. The empty name is a group of
//! its own and stands for commits nobody could be attributed to.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::ledger::CommitLedger;

/// Totals for one contributor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorRecord {
    pub name: String,
    pub line_count: usize,
    pub commit_count: usize,
    pub files: BTreeSet<String>,
}

impl AuthorRecord {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            line_count: 0,
            commit_count: 0,
            files: BTreeSet::new(),
        }
    }

    /// Number of distinct files touched
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

/// Contributor name to totals
pub type AuthorMap = BTreeMap<String, AuthorRecord>;

/// Fold every commit of the ledger into per-contributor totals
pub fn aggregate(ledger: &CommitLedger) -> AuthorMap {
    let mut authors = AuthorMap::new();

    for commit in ledger.records() {
        let author = authors
            .entry(commit.contributor.clone())
            .or_insert_with(|| AuthorRecord::new(&commit.contributor));

        author.line_count += commit.line_count;
        author.commit_count += 1;
        author.files.extend(commit.files.iter().cloned());
    }

    log::debug!("Aggregated {} commits into {} authors", ledger.len(), authors.len());
    authors
}
