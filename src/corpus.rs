//! The corpus: a vector index and chunk store advancing in lockstep, plus
//! the shared handle that makes indexing runs atomic to readers.
//!
//! Invariant: `index.len() == store.len()` after every completed mutation;
//! position *i* in the index always resolves to the chunk embedded at
//! position *i* in the store. [`Corpus::push`] is the only append path and
//! touches the store only after the index accepted the vector, so a failed
//! append cannot break the pairing.
//!
//! An indexing run never mutates the published corpus: it builds a fresh
//! [`Corpus`] off to the side and [`SharedCorpus::publish`]es it with one
//! `Arc` swap. A query that took its [`SharedCorpus::snapshot`] before the
//! swap keeps reading the old generation, which stays internally
//! consistent.

use std::sync::{Arc, RwLock};

use crate::error::Result;
use crate::index::VectorIndex;
use crate::models::Chunk;
use crate::store::DocumentStore;

pub struct Corpus {
    index: Box<dyn VectorIndex>,
    store: DocumentStore,
}

impl Corpus {
    pub fn new(index: Box<dyn VectorIndex>) -> Self {
        Self {
            index,
            store: DocumentStore::new(),
        }
    }

    /// Append one vector/chunk pair, keeping both sides in lockstep.
    /// Returns the position assigned to the pair.
    pub fn push(&mut self, vector: Vec<f32>, chunk: Chunk) -> Result<usize> {
        self.index.add(std::slice::from_ref(&vector))?;
        Ok(self.store.append(chunk))
    }

    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Reset both sides in one step so the lockstep invariant is never
    /// observable mid-reset. The serving path replaces the corpus wholesale
    /// via [`SharedCorpus::publish`] instead of clearing in place.
    pub fn clear(&mut self) {
        self.index.clear();
        self.store.clear();
    }
}

/// Process-wide corpus slot shared between the indexer and concurrent
/// query handlers.
///
/// Readers clone the inner `Arc` under a briefly held read lock and then
/// search without holding any lock; the indexer swaps in a replacement
/// under a write lock held only for the assignment.
#[derive(Clone)]
pub struct SharedCorpus {
    inner: Arc<RwLock<Arc<Corpus>>>,
}

impl SharedCorpus {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(corpus))),
        }
    }

    /// Cheap consistent view of the currently published corpus.
    pub fn snapshot(&self) -> Arc<Corpus> {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Atomically replace the published corpus.
    pub fn publish(&self, corpus: Corpus) {
        let mut slot = self
            .inner
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Arc::new(corpus);
    }
}
