//! Per-author statistics from git blame
//!
//! Every line of every tracked file at a revision is attributed to the
//! contributor of the commit that last touched it. Contributors are then
//! ranked by surviving lines, distinct commits and distinct files.

pub mod app;
pub mod authors;
pub mod blame;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod filters;
pub mod ledger;
pub mod logging;
pub mod output;
pub mod ranking;
pub mod source;

pub use authors::{AuthorMap, AuthorRecord};
pub use blame::{AttributionMode, BlameRecord, Hunk};
pub use engine::{Aggregation, Engine, EngineOptions, FailurePolicy};
pub use error::{FameError, FameResult, SourceError};
pub use ledger::{CommitLedger, CommitRecord};
pub use ranking::SortKey;
pub use source::{AttributionSource, GitSource, LastChange};
