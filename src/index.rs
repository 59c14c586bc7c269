//! Exact nearest-neighbor vector index.
//!
//! [`VectorIndex`] is the seam between retrieval and the search structure;
//! [`FlatIndex`] is the one conforming implementation — a brute-force scan
//! over every stored vector. An approximate index can slot in behind the
//! same trait without touching the retriever.
//!
//! Vectors are stored and searched as-is: no normalization is applied, so
//! embedding magnitude affects squared-L2 ranking. The default local model
//! emits unit-length vectors, for which squared-L2 and cosine orderings
//! coincide; the metric stays configurable for backends that do not
//! normalize.

use serde::Deserialize;

use crate::error::{IndexError, Result};

/// Distance metric used to rank neighbors. Lower is closer for both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Squared Euclidean distance (no square root), the default.
    #[default]
    SquaredL2,
    /// Cosine distance, `1 − cos(a, b)`.
    Cosine,
}

/// Append-only nearest-neighbor index over fixed-dimension vectors.
///
/// Positions are assigned sequentially from zero and never reused within
/// one index instance.
pub trait VectorIndex: Send + Sync {
    /// Append vectors; each receives the next sequential position.
    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()>;

    /// Return up to `k` positions ordered by ascending distance to `query`,
    /// with their distances in a parallel vector. Fewer than `k` results
    /// (or none at all) is not an error — the index may simply be smaller.
    fn search(&self, query: &[f32], k: usize) -> Result<(Vec<usize>, Vec<f32>)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn dims(&self) -> usize;

    /// Reset to empty; existing positions become invalid.
    fn clear(&mut self);
}

/// Exact brute-force index: every search scans all stored vectors.
pub struct FlatIndex {
    dims: usize,
    metric: DistanceMetric,
    vectors: Vec<Vec<f32>>,
}

impl FlatIndex {
    pub fn new(dims: usize, metric: DistanceMetric) -> Self {
        Self {
            dims,
            metric,
            vectors: Vec::new(),
        }
    }

    fn distance(&self, a: &[f32], b: &[f32]) -> f32 {
        match self.metric {
            DistanceMetric::SquaredL2 => squared_l2(a, b),
            DistanceMetric::Cosine => 1.0 - cosine_similarity(a, b),
        }
    }
}

impl VectorIndex for FlatIndex {
    fn add(&mut self, vectors: &[Vec<f32>]) -> Result<()> {
        for vector in vectors {
            if vector.len() != self.dims {
                return Err(IndexError::DimensionMismatch {
                    expected: self.dims,
                    got: vector.len(),
                });
            }
        }
        self.vectors.extend(vectors.iter().cloned());
        Ok(())
    }

    fn search(&self, query: &[f32], k: usize) -> Result<(Vec<usize>, Vec<f32>)> {
        if self.vectors.is_empty() || k == 0 {
            return Ok((Vec::new(), Vec::new()));
        }
        if query.len() != self.dims {
            return Err(IndexError::DimensionMismatch {
                expected: self.dims,
                got: query.len(),
            });
        }

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(position, vector)| (position, self.distance(query, vector)))
            .collect();

        scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored.into_iter().unzip())
    }

    fn len(&self) -> usize {
        self.vectors.len()
    }

    fn dims(&self) -> usize {
        self.dims
    }

    fn clear(&mut self) {
        self.vectors.clear();
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Cosine similarity in `[-1.0, 1.0]`; `0.0` for a zero-magnitude vector.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    dot / denom
}
