//! Library-level pipeline tests: index a fixture project with the `hash`
//! embedding provider (deterministic, no model download, no network) and
//! exercise retrieval and prompt composition end to end.

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use sourcemind::config::Config;
use sourcemind::corpus::SharedCorpus;
use sourcemind::index::VectorIndex;
use sourcemind::prompt::{self, NO_CONTEXT_PLACEHOLDER};
use sourcemind::{indexer, retriever, IndexError};

fn test_config() -> Config {
    let mut config = Config::default();
    config.embedding.provider = "hash".to_string();
    config.chunking.chunk_size = 200;
    config.chunking.chunk_overlap = 20;
    config
}

fn empty_corpus(config: &Config) -> SharedCorpus {
    indexer::empty_corpus(config).unwrap()
}

/// Three allow-listed files (none of the distractors shares a token with
/// the retrieval queries below) plus one disallowed-extension file.
fn fixture_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_fixture_files(tmp.path());
    tmp
}

fn write_fixture_files(root: &Path) {
    fs::write(
        root.join("util.py"),
        "def add(a, b):\n    return a + b\n",
    )
    .unwrap();
    fs::write(
        root.join("main.js"),
        "function greet(name) {\n  console.log('hello from the greeter module');\n  return name + ' welcome banner';\n}\n",
    )
    .unwrap();
    fs::write(
        root.join("notes.txt"),
        "parser grammar tokens lexer syntax tree walker visitor pattern state machine transitions\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "# Project documentation\n").unwrap();
}

#[tokio::test]
async fn test_index_counts_allowlisted_files_only() {
    let project = fixture_project();
    let config = test_config();
    let corpus = empty_corpus(&config);

    let report = indexer::index_project(project.path(), &config, &corpus)
        .await
        .unwrap();

    assert_eq!(report.files_indexed, 3);
    assert!(report.skipped.is_empty());
    assert!(report.chunks_indexed >= 3);
}

#[tokio::test]
async fn test_unreadable_file_is_skipped_not_fatal() {
    let project = fixture_project();
    // Invalid UTF-8 in an allow-listed file.
    fs::write(project.path().join("bad.py"), [0xff, 0xfe, 0xff, 0x00]).unwrap();

    let config = test_config();
    let corpus = empty_corpus(&config);
    let report = indexer::index_project(project.path(), &config, &corpus)
        .await
        .unwrap();

    assert_eq!(report.files_indexed, 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, "bad.py");
    assert!(!report.skipped[0].reason.is_empty());
}

#[tokio::test]
async fn test_empty_file_counts_as_indexed() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("empty.py"), "").unwrap();

    let config = test_config();
    let corpus = empty_corpus(&config);
    let report = indexer::index_project(tmp.path(), &config, &corpus)
        .await
        .unwrap();

    assert_eq!(report.files_indexed, 1);
    assert_eq!(report.chunks_indexed, 0);
}

#[tokio::test]
async fn test_missing_path_is_invalid() {
    let config = test_config();
    let corpus = empty_corpus(&config);

    let err = indexer::index_project(Path::new("/no/such/dir"), &config, &corpus)
        .await
        .unwrap_err();
    assert!(matches!(err, IndexError::InvalidPath(_)));
}

#[tokio::test]
async fn test_file_path_is_invalid() {
    let project = fixture_project();
    let config = test_config();
    let corpus = empty_corpus(&config);

    let err = indexer::index_project(&project.path().join("util.py"), &config, &corpus)
        .await
        .unwrap_err();
    assert!(matches!(err, IndexError::InvalidPath(_)));
}

#[tokio::test]
async fn test_retrieve_on_empty_corpus_returns_nothing() {
    let config = test_config();
    let corpus = empty_corpus(&config);

    let hits = retriever::retrieve("what does add do", 3, &config, &corpus)
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_retrieve_returns_single_chunk_regardless_of_k() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("only.py"), "def solo():\n    pass\n").unwrap();

    let config = test_config();
    let corpus = empty_corpus(&config);
    indexer::index_project(tmp.path(), &config, &corpus)
        .await
        .unwrap();

    let hits = retriever::retrieve("solo", 3, &config, &corpus).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].source_file, "only.py");
}

#[tokio::test]
async fn test_end_to_end_question_retrieves_the_right_file() {
    let project = fixture_project();
    let config = test_config();
    let corpus = empty_corpus(&config);
    indexer::index_project(project.path(), &config, &corpus)
        .await
        .unwrap();

    let hits = retriever::retrieve("what does add do", 3, &config, &corpus)
        .await
        .unwrap();

    assert!(!hits.is_empty());
    assert_eq!(hits[0].source_file, "util.py");
    assert!(hits[0].text.contains("return a + b"));

    // Distances come back in non-decreasing order.
    for pair in hits.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }

    let full_prompt = prompt::compose_query_prompt(&hits, "", "what does add do");
    assert!(full_prompt.contains("File: util.py"));
    assert!(full_prompt.contains("return a + b"));
}

#[tokio::test]
async fn test_corpus_lockstep_after_indexing() {
    let project = fixture_project();
    let config = test_config();
    let corpus = empty_corpus(&config);
    indexer::index_project(project.path(), &config, &corpus)
        .await
        .unwrap();

    let snapshot = corpus.snapshot();
    assert_eq!(snapshot.index().len(), snapshot.store().len());
    for position in 0..snapshot.index().len() {
        assert!(
            snapshot.store().get(position).is_some(),
            "position {} valid in the index but missing from the store",
            position
        );
    }
}

#[tokio::test]
async fn test_reindexing_replaces_the_corpus_wholesale() {
    let first = fixture_project();
    let config = test_config();
    let corpus = empty_corpus(&config);
    indexer::index_project(first.path(), &config, &corpus)
        .await
        .unwrap();

    let second = TempDir::new().unwrap();
    fs::write(
        second.path().join("other.py"),
        "def multiply(x, y):\n    return x * y\n",
    )
    .unwrap();
    indexer::index_project(second.path(), &config, &corpus)
        .await
        .unwrap();

    let snapshot = corpus.snapshot();
    for position in 0..snapshot.store().len() {
        assert_eq!(snapshot.store().get(position).unwrap().source_file, "other.py");
    }

    // Content from the first project is gone, not merged.
    let hits = retriever::retrieve("what does add do", 5, &config, &corpus)
        .await
        .unwrap();
    assert!(hits.iter().all(|hit| hit.source_file == "other.py"));
}

#[tokio::test]
async fn test_snapshot_survives_concurrent_reindex() {
    let project = fixture_project();
    let config = test_config();
    let corpus = empty_corpus(&config);
    indexer::index_project(project.path(), &config, &corpus)
        .await
        .unwrap();

    // A reader holding a snapshot across a reindex keeps its generation.
    let before = corpus.snapshot();
    let held = before.store().len();

    let second = TempDir::new().unwrap();
    fs::write(second.path().join("new.py"), "def fresh():\n    pass\n").unwrap();
    indexer::index_project(second.path(), &config, &corpus)
        .await
        .unwrap();

    assert_eq!(before.store().len(), held);
    assert_eq!(before.index().len(), held);
    assert_eq!(corpus.snapshot().store().len(), 1);
}

#[tokio::test]
async fn test_prompt_placeholder_when_nothing_indexed() {
    let config = test_config();
    let corpus = empty_corpus(&config);

    let hits = retriever::retrieve("anything", 3, &config, &corpus)
        .await
        .unwrap();
    let full_prompt = prompt::compose_query_prompt(&hits, "", "anything");
    assert!(full_prompt.contains(NO_CONTEXT_PLACEHOLDER));
}

#[tokio::test]
async fn test_nested_directories_are_walked() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("pkg/inner")).unwrap();
    fs::write(
        tmp.path().join("pkg/inner/deep.py"),
        "def nested():\n    pass\n",
    )
    .unwrap();

    let config = test_config();
    let corpus = empty_corpus(&config);
    let report = indexer::index_project(tmp.path(), &config, &corpus)
        .await
        .unwrap();

    assert_eq!(report.files_indexed, 1);
    let snapshot = corpus.snapshot();
    let source = &snapshot.store().get(0).unwrap().source_file;
    assert!(source.ends_with("deep.py"));
    assert!(source.contains("pkg"));
}
