//! Semantic retrieval: embed a query, search the corpus, resolve chunks.

use anyhow::Result;
use tracing::debug;

use crate::config::Config;
use crate::corpus::SharedCorpus;
use crate::embedding;
use crate::index::VectorIndex;
use crate::models::ScoredChunk;

/// Retrieve up to `k` chunks nearest to `query`, ranked by ascending
/// distance.
///
/// Returns an empty vector for an empty corpus — "nothing indexed yet" is
/// a condition the prompt composer phrases, not an error. A search hit
/// whose position the store cannot resolve (impossible while the lockstep
/// invariant holds, but defended against) is skipped silently.
pub async fn retrieve(
    query: &str,
    k: usize,
    config: &Config,
    corpus: &SharedCorpus,
) -> Result<Vec<ScoredChunk>> {
    let snapshot = corpus.snapshot();
    if snapshot.is_empty() {
        return Ok(Vec::new());
    }

    let query_vector = embedding::embed_query(&config.embedding, query).await?;
    let (positions, distances) = snapshot.index().search(&query_vector, k)?;

    let mut results = Vec::with_capacity(positions.len());
    for (position, distance) in positions.into_iter().zip(distances) {
        if let Some(chunk) = snapshot.store().get(position) {
            results.push(ScoredChunk::new(chunk.clone(), distance));
        }
    }

    debug!(query, hits = results.len(), "retrieval complete");
    Ok(results)
}
