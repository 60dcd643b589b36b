//! Application execution

use anyhow::{Context, Result};
use log::{debug, info};

use crate::config::FameConfig;
use crate::engine::{Aggregation, Engine, EngineOptions};
use crate::filters::FileFilter;
use crate::output;
use crate::source::{AttributionSource, GitSource};

use super::repository::resolve_repository_path;

/// Attribute, rank and render the files of `source` selected by `config`
pub fn run_with_source<S: AttributionSource>(source: S, config: &FameConfig) -> Result<(Aggregation, String)> {
    let files = source
        .list_files(&config.revision)
        .with_context(|| format!("Failed to list files at revision {}", config.revision))?;

    let filter = FileFilter::new(&config.exclude, &config.extensions, &config.languages, &config.restrict_to)?;
    let files = filter.apply(files);
    debug!("{} files selected for attribution", files.len());

    let options = EngineOptions {
        mode: config.mode,
        failure_policy: config.failure_policy,
        threads: config.threads,
    };
    let engine = Engine::new(source, options).context("Failed to build worker thread pool")?;

    let aggregation = engine.aggregate(&files, &config.revision)?;
    let rendered = output::render(&aggregation.ranked(config.order_by), config.format)?;

    Ok((aggregation, rendered))
}

/// Run against the git repository named in `config` and return the rendered report
pub fn run_fame(config: &FameConfig) -> Result<String> {
    let repo_path = resolve_repository_path(&config.repository)?;
    let source = GitSource::open(&repo_path)?;

    info!(
        "Ranking contributors of {} at {} by {}",
        repo_path.display(),
        config.revision,
        config.order_by
    );

    let (aggregation, rendered) = run_with_source(source, config)?;
    if !aggregation.skipped.is_empty() {
        info!("{} files were skipped after attribution errors", aggregation.skipped.len());
    }

    Ok(rendered)
}
