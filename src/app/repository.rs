//! Repository path resolution

use anyhow::{Context, Result};
use git2::Repository;
use log::debug;
use std::path::{Path, PathBuf};

/// Expand a leading `~` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix('~') {
        Some(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest.trim_start_matches('/')),
            None => PathBuf::from(path),
        },
        None => PathBuf::from(path),
    }
}

/// Resolve the working tree root of the repository containing `path`
///
/// A subdirectory of a repository resolves to the repository root.
pub fn resolve_repository_path(path: &Path) -> Result<PathBuf> {
    let expanded = expand_home(&path.to_string_lossy());
    debug!("Resolving repository from: {}", expanded.display());

    if !expanded.exists() {
        anyhow::bail!(
            "Directory does not exist: {}\n\nPlease check the path and try again.",
            expanded.display()
        );
    }

    let repo = Repository::discover(&expanded).with_context(|| {
        format!(
            "Not a valid git repository: {}\n\nRun gitfame inside a git working tree or pass --repository <PATH>.",
            expanded.display()
        )
    })?;

    let root = repo.workdir().unwrap_or_else(|| repo.path());
    root.canonicalize()
        .with_context(|| format!("Failed to resolve canonical path for: {}", root.display()))
}
