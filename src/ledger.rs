//! Commit Ledger
//!
//! Accumulates parsed hunks from every file into one record per commit hash.
//! Folding is additive, so files can be folded in any order, and ledgers built
//! independently (one per worker or per file) can be merged afterwards.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::blame::{BlameRecord, Hunk};

/// Accumulated attribution for a single commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub hash: String,
    /// Empty until a hunk or fallback lookup supplies a name
    pub contributor: String,
    pub line_count: usize,
    pub files: BTreeSet<String>,
}

impl CommitRecord {
    fn seeded(hunk: &Hunk, file: &str) -> Self {
        Self {
            hash: hunk.commit_hash.clone(),
            contributor: hunk.contributor.clone().unwrap_or_default(),
            line_count: hunk.line_count,
            files: BTreeSet::from([file.to_string()]),
        }
    }

    /// Backfill an empty contributor; a name already present is kept
    fn backfill(&mut self, contributor: Option<&str>) {
        if self.contributor.is_empty() {
            if let Some(name) = contributor.filter(|name| !name.is_empty()) {
                self.contributor = name.to_string();
            }
        }
    }
}

/// Mapping from commit hash to its accumulated record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitLedger {
    commits: BTreeMap<String, CommitRecord>,
}

impl CommitLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one hunk seen in `file`
    pub fn fold(&mut self, hunk: &Hunk, file: &str) {
        match self.commits.entry(hunk.commit_hash.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(CommitRecord::seeded(hunk, file));
            }
            Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                record.line_count += hunk.line_count;
                record.files.insert(file.to_string());
                record.backfill(hunk.contributor.as_deref());
            }
        }
    }

    /// Overwrite the contributor of a known commit (committer attribution)
    ///
    /// Returns false when the hash has not been folded yet.
    pub fn rename(&mut self, commit_hash: &str, name: &str) -> bool {
        match self.commits.get_mut(commit_hash) {
            Some(record) => {
                record.contributor = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Apply a parsed record from `file`
    pub fn apply(&mut self, record: &BlameRecord, file: &str) {
        match record {
            BlameRecord::Hunk(hunk) => self.fold(hunk, file),
            BlameRecord::Committer { commit_hash, name } => {
                if !self.rename(commit_hash, name) {
                    log::debug!("Ignoring committer for unknown commit {} in {}", commit_hash, file);
                }
            }
        }
    }

    /// Apply every record parsed from `file`, in order
    pub fn apply_all<'a, I>(&mut self, records: I, file: &str)
    where
        I: IntoIterator<Item = &'a BlameRecord>,
    {
        for record in records {
            self.apply(record, file);
        }
    }

    /// Merge another ledger into this one with the same additive rules as `fold`
    pub fn merge(mut self, other: CommitLedger) -> CommitLedger {
        for (hash, incoming) in other.commits {
            match self.commits.entry(hash) {
                Entry::Vacant(slot) => {
                    slot.insert(incoming);
                }
                Entry::Occupied(mut slot) => {
                    let record = slot.get_mut();
                    record.line_count += incoming.line_count;
                    record.files.extend(incoming.files);
                    record.backfill(Some(&incoming.contributor));
                }
            }
        }
        self
    }

    pub fn get(&self, commit_hash: &str) -> Option<&CommitRecord> {
        self.commits.get(commit_hash)
    }

    pub fn records(&self) -> impl Iterator<Item = &CommitRecord> {
        self.commits.values()
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// Sum of line counts over all commits
    pub fn total_lines(&self) -> usize {
        self.commits.values().map(|c| c.line_count).sum()
    }
}
