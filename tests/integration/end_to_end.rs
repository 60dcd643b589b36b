//! End-to-end tests against throwaway repositories
//!
//! Blame text comes from the `git` executable, so tests return early when it
//! is not installed.

use git2::{Commit, Oid, Repository, Signature, Time};
use gitfame::app::run_with_source;
use gitfame::config::FameConfig;
use gitfame::output::OutputFormat;
use gitfame::{AttributionMode, AttributionSource, Engine, EngineOptions, FailurePolicy, FameError, GitSource, SortKey};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

fn signature(name: &str, seconds: i64) -> Signature<'static> {
    let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
    Signature::new(name, &email, &Time::new(seconds, 0)).expect("Failed to build signature")
}

/// Write `files` into the working tree and commit them on HEAD
fn commit(repo: &Repository, files: &[(&str, &str)], author: &Signature, committer: &Signature, message: &str) -> Oid {
    let workdir = repo.workdir().expect("Test repository has a working tree");
    let mut index = repo.index().expect("Failed to open index");

    for (path, content) in files {
        let full_path = workdir.join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create directories");
        }
        fs::write(&full_path, content).expect("Failed to write file");
        index.add_path(Path::new(path)).expect("Failed to stage file");
    }
    index.write().expect("Failed to write index");

    let tree = repo.find_tree(index.write_tree().expect("Failed to write tree")).expect("Failed to find tree");
    let parents: Vec<Commit<'_>> = match repo.head() {
        Ok(head) => vec![head.peel_to_commit().expect("HEAD is a commit")],
        Err(_) => Vec::new(),
    };
    let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();

    repo.commit(Some("HEAD"), author, committer, message, &tree, &parent_refs)
        .expect("Failed to commit")
}

/// History used by most tests:
///
/// 1. Alice adds `src/a.go` (3 lines) and `README.md` (1 line)
/// 2. Bob, committed by Integrator, adds `src/b.go` (3 lines) and appends 2 lines to `src/a.go`
/// 3. Alice appends 1 line to `README.md`
fn create_fixture_repo() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let repo = Repository::init(dir.path()).expect("Failed to init repository");

    let alice = signature("Alice", 1_700_000_000);
    commit(
        &repo,
        &[("src/a.go", "one\ntwo\nthree\n"), ("README.md", "hello\n")],
        &alice,
        &alice,
        "initial import",
    );

    let bob = signature("Bob", 1_700_000_100);
    let integrator = signature("Integrator", 1_700_000_200);
    commit(
        &repo,
        &[("src/b.go", "x\ny\nz\n"), ("src/a.go", "one\ntwo\nthree\nfour\nfive\n")],
        &bob,
        &integrator,
        "add b",
    );

    let alice = signature("Alice", 1_700_000_300);
    commit(&repo, &[("README.md", "hello\nworld\n")], &alice, &alice, "expand readme");

    dir
}

fn engine(dir: &TempDir, mode: AttributionMode) -> Engine<GitSource> {
    let source = GitSource::open(dir.path()).expect("Failed to open source");
    let options = EngineOptions {
        mode,
        ..EngineOptions::default()
    };
    Engine::new(source, options).expect("Failed to build engine")
}

#[test]
fn test_list_files_walks_tree() {
    let dir = create_fixture_repo();
    let source = GitSource::open(dir.path()).unwrap();

    let files = source.list_files("HEAD").unwrap();
    assert_eq!(files, vec!["README.md", "src/a.go", "src/b.go"]);

    let first = source.list_files("HEAD~2").unwrap();
    assert_eq!(first, vec!["README.md", "src/a.go"]);
}

#[test]
fn test_unknown_revision_is_a_source_error() {
    let dir = create_fixture_repo();
    let source = GitSource::open(dir.path()).unwrap();

    let err = source.list_files("no-such-branch").unwrap_err();
    assert!(err.to_string().contains("no-such-branch"));
}

#[test]
fn test_author_statistics() {
    if !git_available() {
        return;
    }
    let dir = create_fixture_repo();
    let engine = engine(&dir, AttributionMode::ByAuthor);
    let files = engine.source().list_files("HEAD").unwrap();

    let aggregation = engine.aggregate(&files, "HEAD").unwrap();
    assert_eq!(aggregation.files_processed, 3);
    assert_eq!(aggregation.ledger.total_lines(), 10);

    let alice = &aggregation.authors["Alice"];
    assert_eq!(alice.line_count, 5);
    assert_eq!(alice.commit_count, 2);
    assert_eq!(alice.file_count(), 2);

    let bob = &aggregation.authors["Bob"];
    assert_eq!(bob.line_count, 5);
    assert_eq!(bob.commit_count, 1);
    assert_eq!(bob.file_count(), 2);

    // Equal lines, so commits decide
    let ranked: Vec<&str> = aggregation.ranked(SortKey::Lines).iter().map(|a| a.name.as_str()).collect();
    assert_eq!(ranked, vec!["Alice", "Bob"]);
}

#[test]
fn test_committer_statistics() {
    if !git_available() {
        return;
    }
    let dir = create_fixture_repo();
    let engine = engine(&dir, AttributionMode::ByCommitter);
    let files = engine.source().list_files("HEAD").unwrap();

    let aggregation = engine.aggregate(&files, "HEAD").unwrap();
    assert!(!aggregation.authors.contains_key("Bob"));
    assert_eq!(aggregation.authors["Integrator"].line_count, 5);
    assert_eq!(aggregation.authors["Alice"].line_count, 5);
}

#[test]
fn test_historic_revision() {
    if !git_available() {
        return;
    }
    let dir = create_fixture_repo();
    let engine = engine(&dir, AttributionMode::ByAuthor);
    let files = engine.source().list_files("HEAD~1").unwrap();

    let aggregation = engine.aggregate(&files, "HEAD~1").unwrap();
    assert_eq!(aggregation.authors["Alice"].line_count, 4);
    assert_eq!(aggregation.authors["Alice"].commit_count, 1);
    assert_eq!(aggregation.authors["Bob"].line_count, 5);
}

#[test]
fn test_empty_file_falls_back_to_last_change() {
    if !git_available() {
        return;
    }
    let dir = create_fixture_repo();
    {
        let repo = Repository::open(dir.path()).unwrap();
        let carol = signature("Carol", 1_700_000_400);
        commit(&repo, &[("empty.txt", "")], &carol, &carol, "placeholder");
    }

    let engine = engine(&dir, AttributionMode::ByAuthor);
    let files = engine.source().list_files("HEAD").unwrap();
    let aggregation = engine.aggregate(&files, "HEAD").unwrap();

    let carol = &aggregation.authors["Carol"];
    assert_eq!(carol.line_count, 0);
    assert_eq!(carol.commit_count, 1);
    assert!(carol.files.contains("empty.txt"));
    assert_eq!(aggregation.ledger.total_lines(), 10);
}

#[test]
fn test_missing_file_aborts_or_skips() {
    if !git_available() {
        return;
    }
    let dir = create_fixture_repo();
    let files = vec!["README.md".to_string(), "does/not/exist.go".to_string()];

    let aborting = engine(&dir, AttributionMode::ByAuthor);
    match aborting.aggregate(&files, "HEAD") {
        Err(FameError::Source { file, .. }) => assert_eq!(file, "does/not/exist.go"),
        other => panic!("expected a source error, got {:?}", other.map(|a| a.files_processed)),
    }

    let source = GitSource::open(dir.path()).unwrap();
    let skipping = Engine::new(
        source,
        EngineOptions {
            failure_policy: FailurePolicy::Skip,
            ..EngineOptions::default()
        },
    )
    .unwrap();
    let aggregation = skipping.aggregate(&files, "HEAD").unwrap();
    assert_eq!(aggregation.skipped.len(), 1);
    assert_eq!(aggregation.authors["Alice"].line_count, 2);
}

#[test]
fn test_thread_count_does_not_change_result() {
    if !git_available() {
        return;
    }
    let dir = create_fixture_repo();
    let config = FameConfig {
        repository: dir.path().to_path_buf(),
        format: OutputFormat::Json,
        ..FameConfig::default()
    };

    let mut outputs = Vec::new();
    for threads in [1, 4] {
        let config = FameConfig { threads: Some(threads), ..config.clone() };
        let source = GitSource::open(dir.path()).unwrap();
        let (_, rendered) = run_with_source(source, &config).unwrap();
        outputs.push(rendered);
    }
    assert_eq!(outputs[0], outputs[1]);
}

#[test]
fn test_filtered_csv_report() {
    if !git_available() {
        return;
    }
    let dir = create_fixture_repo();
    let config = FameConfig {
        repository: dir.path().to_path_buf(),
        extensions: vec![".go".to_string()],
        exclude: vec!["b\\.go$".to_string()],
        order_by: SortKey::Files,
        format: OutputFormat::Csv,
        ..FameConfig::default()
    };

    let source = GitSource::open(dir.path()).unwrap();
    let (_, rendered) = run_with_source(source, &config).unwrap();
    assert_eq!(rendered, "Name,Lines,Commits,Files\nAlice,3,1,1\nBob,2,1,1");
}

#[test]
fn test_binary_json_lines_output() {
    if !git_available() {
        return;
    }
    let dir = create_fixture_repo();

    let output = Command::new(env!("CARGO_BIN_EXE_gitfame"))
        .args(["--repository", &dir.path().to_string_lossy(), "--format", "json-lines", "--quiet"])
        .env("GITFAME_CONFIG", dir.path().join("absent.toml"))
        .output()
        .expect("Failed to run gitfame");

    assert!(output.status.success(), "gitfame failed: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], r#"{"name":"Alice","lines":5,"commits":2,"files":2}"#);
    assert_eq!(lines[1], r#"{"name":"Bob","lines":5,"commits":1,"files":2}"#);
}

#[test]
fn test_binary_rejects_unknown_order_key() {
    let dir = create_fixture_repo();

    let output = Command::new(env!("CARGO_BIN_EXE_gitfame"))
        .args(["--repository", &dir.path().to_string_lossy(), "--order-by", "age"])
        .env("GITFAME_CONFIG", dir.path().join("absent.toml"))
        .output()
        .expect("Failed to run gitfame");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid order key"));
}
