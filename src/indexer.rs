//! Indexing pipeline orchestration.
//!
//! Walks a project directory, filters files through the configured glob
//! sets, chunks and batch-embeds each file, and publishes the resulting
//! corpus. The published corpus is never mutated in place: the replacement
//! is built entirely off to the side and swapped in atomically, so a query
//! racing an indexing run always reads one consistent corpus generation.
//!
//! Per-file read/decode failures are recovered here: the file is skipped
//! with a warning and recorded in the report, and the walk continues. An
//! embedding backend failure, by contrast, aborts the run and leaves the
//! previously published corpus untouched.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::chunker::split_text;
use crate::config::Config;
use crate::corpus::{Corpus, SharedCorpus};
use crate::embedding;
use crate::error::{IndexError, Result};
use crate::index::FlatIndex;
use crate::models::{Chunk, IndexReport, SkippedFile};

/// Create the empty shared corpus for process start, sized to the
/// configured embedding provider's dimensionality.
pub fn empty_corpus(config: &Config) -> anyhow::Result<SharedCorpus> {
    let provider = embedding::create_provider(&config.embedding)?;
    Ok(SharedCorpus::new(Corpus::new(Box::new(FlatIndex::new(
        provider.dims(),
        config.retrieval.metric,
    )))))
}

/// Index the project at `root`, replacing the shared corpus wholesale.
///
/// Returns the report of files indexed, chunks produced, and files skipped.
/// A file contributing zero chunks (empty content) still counts as indexed.
///
/// # Errors
///
/// [`IndexError::InvalidPath`] if `root` is missing or not a directory;
/// [`IndexError::Embedding`] if the embedding backend fails.
pub async fn index_project(
    root: &Path,
    config: &Config,
    corpus: &SharedCorpus,
) -> Result<IndexReport> {
    if !root.is_dir() {
        return Err(IndexError::InvalidPath(root.to_path_buf()));
    }

    let include_set = build_globset(&config.indexing.include_globs)?;

    let mut default_excludes = vec![
        "**/.git/**".to_string(),
        "**/target/**".to_string(),
        "**/node_modules/**".to_string(),
    ];
    default_excludes.extend(config.indexing.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut skipped = Vec::new();
    let mut files = Vec::new();

    let walker = WalkDir::new(root).follow_links(config.indexing.follow_symlinks);
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_default();
                warn!(path = %path, error = %e, "skipping unreadable directory entry");
                skipped.push(SkippedFile {
                    path,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        files.push((path.to_path_buf(), rel_str));
    }

    // Sort for deterministic corpus positions.
    files.sort_by(|a, b| a.1.cmp(&b.1));

    let provider = embedding::create_provider(&config.embedding).map_err(IndexError::Embedding)?;
    info!(
        root = %root.display(),
        candidates = files.len(),
        model = provider.model_name(),
        "indexing project"
    );

    let mut fresh = Corpus::new(Box::new(FlatIndex::new(
        provider.dims(),
        config.retrieval.metric,
    )));
    let mut files_indexed = 0usize;

    for (path, rel_str) in files {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!(file = %rel_str, error = %e, "skipping unreadable file");
                skipped.push(SkippedFile {
                    path: rel_str,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        files_indexed += 1;

        let pieces = split_text(
            &content,
            config.chunking.chunk_size,
            config.chunking.chunk_overlap,
        );
        if pieces.is_empty() {
            continue;
        }

        // One embedding batch per file; output order matches input order.
        let vectors = embedding::embed_texts(&config.embedding, &pieces)
            .await
            .map_err(IndexError::Embedding)?;
        if vectors.len() != pieces.len() {
            return Err(IndexError::Embedding(anyhow::anyhow!(
                "expected {} embeddings, got {}",
                pieces.len(),
                vectors.len()
            )));
        }

        for (piece, vector) in pieces.into_iter().zip(vectors) {
            fresh.push(
                vector,
                Chunk {
                    source_file: rel_str.clone(),
                    text: piece,
                },
            )?;
        }
    }

    let chunks_indexed = fresh.len();
    corpus.publish(fresh);

    info!(
        files = files_indexed,
        chunks = chunks_indexed,
        skipped = skipped.len(),
        "indexing complete"
    );

    Ok(IndexReport {
        files_indexed,
        chunks_indexed,
        skipped,
    })
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_glob_pattern_is_reported() {
        let err = build_globset(&["[".to_string()]).unwrap_err();
        assert!(matches!(err, IndexError::Pattern(_)));
    }

    #[test]
    fn test_globset_matches_relative_paths() {
        let set = build_globset(&["**/*.py".to_string()]).unwrap();
        assert!(set.is_match("util.py"));
        assert!(set.is_match("pkg/nested/mod.py"));
        assert!(!set.is_match("notes.md"));
    }
}
