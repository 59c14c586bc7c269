//! Append-only chunk store addressed by insertion position.
//!
//! The counterpart of the vector index: position *i* here holds the chunk
//! whose embedding sits at position *i* in the index. Positions are never
//! reused or renumbered within one corpus generation.

use crate::models::Chunk;

#[derive(Debug, Default)]
pub struct DocumentStore {
    chunks: Vec<Chunk>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and return its position.
    pub fn append(&mut self, chunk: Chunk) -> usize {
        self.chunks.push(chunk);
        self.chunks.len() - 1
    }

    pub fn get(&self, position: usize) -> Option<&Chunk> {
        self.chunks.get(position)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Reset to empty. Only ever called through [`crate::corpus::Corpus::clear`],
    /// which resets the vector index in the same step.
    pub fn clear(&mut self) {
        self.chunks.clear();
    }
}
