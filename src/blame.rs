//! Attribution Record Parser
//!
//! Turns the porcelain output of `git blame` for a single file into a sequence
//! of typed records. The porcelain stream is a run of header lines
//! (`<hash> <orig-line> <final-line> [<group-size>]`), metadata lines that are
//! only present the first time a commit shows up in the output (`author`,
//! `committer`, `summary`, ...), and tab-prefixed content lines.
//!
//! A header carrying a fourth field opens a new hunk. It is either followed by
//! an `author ` line (first sighting of the commit in this output) or directly
//! by its content line (a commit already introduced earlier in the output).

use std::fmt;
use std::str::FromStr;

use crate::error::{FameError, FameResult};

const AUTHOR_PREFIX: &str = "author ";
const COMMITTER_PREFIX: &str = "committer ";
const CONTENT_PREFIX: char = '\t';
const HEADER_FIELDS: usize = 4;

/// Which identity a line is credited to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributionMode {
    #[default]
    ByAuthor,
    ByCommitter,
}

impl AttributionMode {
    /// Mode selected by a `use-committer` style flag
    pub fn from_use_committer(use_committer: bool) -> Self {
        if use_committer {
            Self::ByCommitter
        } else {
            Self::ByAuthor
        }
    }
}

impl FromStr for AttributionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "author" | "by-author" => Ok(Self::ByAuthor),
            "committer" | "by-committer" => Ok(Self::ByCommitter),
            _ => Err(format!("Invalid attribution mode: {}. Valid options: by-author, by-committer", s)),
        }
    }
}

impl fmt::Display for AttributionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByAuthor => write!(f, "by-author"),
            Self::ByCommitter => write!(f, "by-committer"),
        }
    }
}

/// A contiguous run of lines credited to one commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hunk {
    pub commit_hash: String,
    /// Present only when the commit is introduced at this point of the output
    pub contributor: Option<String>,
    pub line_count: usize,
}

impl Hunk {
    pub fn new(commit_hash: impl Into<String>, contributor: Option<String>, line_count: usize) -> Self {
        Self {
            commit_hash: commit_hash.into(),
            contributor,
            line_count,
        }
    }

    /// Zero-line hunk for a file resolved through the last-change lookup
    pub fn fallback(commit_hash: impl Into<String>, contributor: impl Into<String>) -> Self {
        Self::new(commit_hash, Some(contributor.into()), 0)
    }
}

/// One parsed unit of attribution output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlameRecord {
    Hunk(Hunk),
    /// Committer identity for the most recently introduced commit
    Committer { commit_hash: String, name: String },
}

/// Scanner position relative to the porcelain grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Inside a header's metadata block; header lines are not expected
    InHunk,
    /// A content line was just consumed, the next line is a header
    ExpectHeader,
}

/// Parse porcelain blame output for `file`
///
/// A header that introduces a commit is counted through its `author ` line.
/// Continuation headers (four fields, no `author ` line following) are
/// counted at the start of the text or right after a content line. Errors carry the file
/// path and the 1-based line number of the offending header.
pub fn parse_porcelain(file: &str, text: &str, mode: AttributionMode) -> FameResult<Vec<BlameRecord>> {
    let lines: Vec<&str> = text.lines().collect();
    let mut records = Vec::new();
    // The start of a stream is a header position
    let mut state = ScanState::ExpectHeader;
    let mut open_commit: Option<String> = None;

    for (index, line) in lines.iter().enumerate() {
        if let Some(name) = line.strip_prefix(AUTHOR_PREFIX) {
            if index == 0 {
                continue;
            }
            let (hash, line_count) = parse_header(file, index, lines[index - 1])?;
            open_commit = Some(hash.to_string());
            records.push(BlameRecord::Hunk(Hunk::new(hash, Some(name.to_string()), line_count)));
            state = ScanState::InHunk;
        } else if line.starts_with(CONTENT_PREFIX) {
            state = ScanState::ExpectHeader;
        } else if state == ScanState::ExpectHeader {
            state = ScanState::InHunk;

            // A header followed by `author ` is picked up on the next line
            let introduces_commit = lines
                .get(index + 1)
                .is_some_and(|next| next.starts_with(AUTHOR_PREFIX));
            if introduces_commit {
                continue;
            }

            if line.split_whitespace().count() == HEADER_FIELDS {
                let (hash, line_count) = parse_header(file, index + 1, line)?;
                records.push(BlameRecord::Hunk(Hunk::new(hash, None, line_count)));
            }
        } else if mode == AttributionMode::ByCommitter {
            if let (Some(name), Some(hash)) = (line.strip_prefix(COMMITTER_PREFIX), open_commit.as_ref()) {
                records.push(BlameRecord::Committer {
                    commit_hash: hash.clone(),
                    name: name.to_string(),
                });
            }
        }
    }

    Ok(records)
}

/// Split a group header into its hash and group size
fn parse_header<'a>(file: &str, line_number: usize, header: &'a str) -> FameResult<(&'a str, usize)> {
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() != HEADER_FIELDS {
        return Err(FameError::malformed(file, line_number, header));
    }

    let line_count = fields[3]
        .parse::<usize>()
        .map_err(|_| FameError::invalid_line_count(file, line_number, fields[3]))?;

    Ok((fields[0], line_count))
}
