//! Core data models used throughout SourceMind.
//!
//! These types represent the chunks, retrieval hits, and indexing reports
//! that flow through the indexing and retrieval pipeline.

use serde::Serialize;

/// A bounded slice of one source file's text — the unit of retrieval.
///
/// `source_file` is the path relative to the indexed project root.
/// Immutable once created; a new indexing run produces new chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub source_file: String,
    pub text: String,
}

/// A retrieved chunk paired with its distance to the query vector.
///
/// Lower distance means more relevant under the configured metric.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredChunk {
    pub source_file: String,
    pub text: String,
    pub distance: f32,
}

impl ScoredChunk {
    pub fn new(chunk: Chunk, distance: f32) -> Self {
        Self {
            source_file: chunk.source_file,
            text: chunk.text,
            distance,
        }
    }
}

/// Diagnostic recorded when the indexer skips a file it could not read
/// or decode as UTF-8 text.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    /// Path relative to the indexed root.
    pub path: String,
    /// Human-readable reason (the underlying I/O error).
    pub reason: String,
}

/// Summary returned by a completed indexing run.
#[derive(Debug, Clone, Serialize)]
pub struct IndexReport {
    /// Files read and indexed successfully (a file contributing zero
    /// chunks still counts).
    pub files_indexed: usize,
    /// Total chunks appended to the corpus.
    pub chunks_indexed: usize,
    /// Files skipped due to read/decode failures; never aborts the run.
    pub skipped: Vec<SkippedFile>,
}
