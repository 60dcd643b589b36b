//! Aggregation Engine
//!
//! Drives the pipeline for a list of files: raw attribution, parse, fold into
//! a per-file ledger, merge the ledgers, and group by contributor. Files are
//! read and parsed on a rayon pool; results are gathered in input order before
//! the failure policy is applied so the outcome does not depend on scheduling.

use std::fmt;
use std::str::FromStr;

use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

use crate::authors::{self, AuthorMap, AuthorRecord};
use crate::blame::{self, AttributionMode, Hunk};
use crate::error::{FameError, FameResult};
use crate::ledger::CommitLedger;
use crate::ranking::{self, SortKey};
use crate::source::AttributionSource;

/// What to do when one file's attribution fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop and return the first failure in input order
    #[default]
    Abort,
    /// Log the failure, leave the file out and keep going
    Skip,
}

impl FailurePolicy {
    pub fn from_skip_errors(skip: bool) -> Self {
        if skip {
            Self::Skip
        } else {
            Self::Abort
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            _ => Err(format!("Invalid failure policy: {}. Valid options: abort, skip", s)),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Abort => write!(f, "abort"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOptions {
    pub mode: AttributionMode,
    pub failure_policy: FailurePolicy,
    /// Worker threads for parsing; rayon's default when unset
    pub threads: Option<usize>,
}

/// Outcome of one aggregation run
#[derive(Debug)]
pub struct Aggregation {
    pub ledger: CommitLedger,
    pub authors: AuthorMap,
    /// Files that contributed at least one commit
    pub files_processed: usize,
    /// Files left out under `FailurePolicy::Skip`
    pub skipped: Vec<FameError>,
}

impl Aggregation {
    pub fn ranked(&self, key: SortKey) -> Vec<&AuthorRecord> {
        ranking::rank(&self.authors, key)
    }
}

/// Blame aggregation over an attribution source
pub struct Engine<S> {
    source: S,
    options: EngineOptions,
    pool: Option<ThreadPool>,
}

impl<S: AttributionSource> Engine<S> {
    pub fn new(source: S, options: EngineOptions) -> Result<Self, ThreadPoolBuildError> {
        let pool = match options.threads {
            Some(threads) => Some(ThreadPoolBuilder::new().num_threads(threads).build()?),
            None => None,
        };

        Ok(Self { source, options, pool })
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Aggregate attribution for `files` at `revision`
    pub fn aggregate(&self, files: &[String], revision: &str) -> FameResult<Aggregation> {
        info!(
            "Aggregating {} files at {} ({})",
            files.len(),
            revision,
            self.options.mode
        );

        let outcomes = self.install(|| {
            files
                .par_iter()
                .map(|file| self.attribute_file(file, revision))
                .collect::<Vec<_>>()
        });

        let mut ledgers = Vec::with_capacity(outcomes.len());
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(Some(ledger)) => ledgers.push(ledger),
                Ok(None) => {}
                Err(e) => match self.options.failure_policy {
                    FailurePolicy::Abort => return Err(e),
                    FailurePolicy::Skip => {
                        warn!("Skipping {}: {}", e.file(), e);
                        skipped.push(e);
                    }
                },
            }
        }

        let files_processed = ledgers.len();
        let ledger = self.install(|| {
            ledgers
                .into_par_iter()
                .reduce(CommitLedger::new, CommitLedger::merge)
        });
        let authors = authors::aggregate(&ledger);

        info!(
            "Processed {} files: {} commits, {} authors, {} skipped",
            files_processed,
            ledger.len(),
            authors.len(),
            skipped.len()
        );

        Ok(Aggregation {
            ledger,
            authors,
            files_processed,
            skipped,
        })
    }

    /// Ledger for a single file, or `None` when the file has no usable history
    pub fn attribute_file(&self, file: &str, revision: &str) -> FameResult<Option<CommitLedger>> {
        let text = self
            .source
            .raw_attribution(file, revision)
            .map_err(|e| FameError::from_source(file, e))?;

        let mut ledger = CommitLedger::new();

        // Only output with no lines at all takes the last-change path
        if text.lines().next().is_none() {
            let change = self
                .source
                .fallback_last_change(file, revision, self.options.mode)
                .map_err(|e| FameError::from_source(file, e))?;

            return match change {
                Some(change) if !change.commit_hash.is_empty() => {
                    debug!("{} has no attribution, credited to last change {}", file, change.commit_hash);
                    ledger.fold(&Hunk::fallback(change.commit_hash, change.contributor), file);
                    Ok(Some(ledger))
                }
                _ => {
                    debug!("{} has no attribution and no history, skipping", file);
                    Ok(None)
                }
            };
        }

        let records = blame::parse_porcelain(file, &text, self.options.mode)?;
        debug!("{}: {} attribution records", file, records.len());
        ledger.apply_all(&records, file);
        if ledger.is_empty() {
            debug!("{}: attribution produced no records", file);
            return Ok(None);
        }
        Ok(Some(ledger))
    }

    fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}
