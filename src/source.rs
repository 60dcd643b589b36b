//! Attribution sources
//!
//! The engine never talks to git directly. It asks an [`AttributionSource`]
//! for the tracked files at a revision, for the raw porcelain blame of one
//! file, and for the last change of a file that blame had nothing to say
//! about. [`GitSource`] answers those questions for a local repository.

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};
use git2::{ObjectType, Oid, Repository, TreeWalkMode, TreeWalkResult};
use log::{debug, info, trace};

use crate::blame::AttributionMode;
use crate::error::SourceError;

/// Commit that last touched a file, with the credited identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastChange {
    pub commit_hash: String,
    pub contributor: String,
}

/// External collaborators the engine depends on
///
/// Implementations must be shareable across the parsing worker threads.
pub trait AttributionSource: Sync {
    /// Tracked file paths at `revision`, in tree order
    fn list_files(&self, revision: &str) -> Result<Vec<String>, SourceError>;

    /// Porcelain blame output for `file`; may be empty
    fn raw_attribution(&self, file: &str, revision: &str) -> Result<String, SourceError>;

    /// Last change of `file`, used when its attribution is empty
    fn fallback_last_change(
        &self,
        file: &str,
        revision: &str,
        mode: AttributionMode,
    ) -> Result<Option<LastChange>, SourceError>;
}

/// Validate that the given path is an accessible git repository
pub fn validate_git_repository<P: AsRef<Path>>(path: P) -> Result<Repository> {
    let path = path.as_ref();
    debug!("Validating git repository at: {}", path.display());

    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let repo = Repository::open(path)
        .with_context(|| format!("Failed to open repository at: {}", path.display()))?;

    if repo.is_bare() {
        debug!("Repository is bare: {}", path.display());
    }

    Ok(repo)
}

/// Attribution backed by a local repository
///
/// File listing and last-change lookups go through libgit2; blame output is
/// produced by the `git` executable so that its porcelain format is exact.
#[derive(Debug, Clone)]
pub struct GitSource {
    path: PathBuf,
    git_binary: String,
}

impl GitSource {
    /// Open the repository at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = validate_git_repository(&path)?;
        let root = repo.workdir().unwrap_or_else(|| repo.path());
        let path = root
            .canonicalize()
            .with_context(|| format!("Failed to resolve canonical path for: {}", root.display()))?;

        info!("Using git repository: {}", path.display());
        Ok(Self {
            path,
            git_binary: "git".to_string(),
        })
    }

    /// Use a specific `git` executable for blame
    pub fn with_git_binary(mut self, git_binary: impl Into<String>) -> Self {
        self.git_binary = git_binary.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn repository(&self) -> Result<Repository, SourceError> {
        Ok(Repository::open(&self.path)?)
    }

    fn resolve_commit<'r>(repo: &'r Repository, revision: &str) -> Result<git2::Commit<'r>, SourceError> {
        repo.revparse_single(revision)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| SourceError::Revision {
                revision: revision.to_string(),
                reason: e.message().to_string(),
            })
    }

    fn entry_id(tree: &git2::Tree<'_>, file: &Path) -> Option<Oid> {
        tree.get_path(file).ok().map(|entry| entry.id())
    }
}

impl AttributionSource for GitSource {
    fn list_files(&self, revision: &str) -> Result<Vec<String>, SourceError> {
        let repo = self.repository()?;
        let tree = Self::resolve_commit(&repo, revision)?.tree()?;

        let mut files = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                if let Some(name) = entry.name() {
                    files.push(format!("{}{}", root, name));
                }
            }
            TreeWalkResult::Ok
        })?;

        debug!("Listed {} files at {}", files.len(), revision);
        Ok(files)
    }

    fn raw_attribution(&self, file: &str, revision: &str) -> Result<String, SourceError> {
        trace!("Running blame for {} at {}", file, revision);
        let output = Command::new(&self.git_binary)
            .args(["blame", "--porcelain", revision, "--", file])
            .current_dir(&self.path)
            .output()?;

        if !output.status.success() {
            return Err(SourceError::Command {
                command: format!("git blame --porcelain {} -- {}", revision, file),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn fallback_last_change(
        &self,
        file: &str,
        revision: &str,
        mode: AttributionMode,
    ) -> Result<Option<LastChange>, SourceError> {
        let repo = self.repository()?;
        let path = Path::new(file);
        let mut commit = Self::resolve_commit(&repo, revision)?;

        // Follow a parent with the same entry; the first commit that differs
        // from every parent is the last change
        loop {
            let id = Self::entry_id(&commit.tree()?, path);

            let mut same_parent = None;
            for parent in commit.parents() {
                if Self::entry_id(&parent.tree()?, path) == id {
                    same_parent = Some(parent);
                    break;
                }
            }

            match same_parent {
                Some(parent) => commit = parent,
                None if id.is_none() => return Ok(None),
                None => break,
            }
        }

        let signature = match mode {
            AttributionMode::ByAuthor => commit.author(),
            AttributionMode::ByCommitter => commit.committer(),
        };
        let contributor = String::from_utf8_lossy(signature.name_bytes()).into_owned();
        debug!("Last change of {} is {} by {:?}", file, commit.id(), contributor);

        Ok(Some(LastChange {
            commit_hash: commit.id().to_string(),
            contributor,
        }))
    }
}
