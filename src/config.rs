//! TOML configuration parsing.
//!
//! Every section and field has a default, so a missing config file yields a
//! fully working configuration (local embeddings, squared-L2 retrieval,
//! Ollama generation on `localhost:11434`, server on `127.0.0.1:8000`).

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::index::DistanceMetric;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub chunking: ChunkingConfig,
    pub indexing: IndexingConfig,
    pub retrieval: RetrievalConfig,
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk length in bytes.
    pub chunk_size: usize,
    /// Bytes of the previous chunk repeated at the start of the next one.
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 100,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct IndexingConfig {
    /// Files to index, matched against paths relative to the project root.
    pub include_globs: Vec<String>,
    /// Extra exclusions on top of the built-in `.git`/`target`/`node_modules`.
    pub exclude_globs: Vec<String>,
    pub follow_symlinks: bool,
}

impl Default for IndexingConfig {
    fn default() -> Self {
        Self {
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

fn default_include_globs() -> Vec<String> {
    [
        "**/*.py", "**/*.js", "**/*.ts", "**/*.tsx", "**/*.rs", "**/*.cpp", "**/*.txt",
        "**/*.json",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of nearest chunks pulled into the prompt context.
    pub top_k: usize,
    /// Distance metric for nearest-neighbor ranking.
    pub metric: DistanceMetric,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            metric: DistanceMetric::SquaredL2,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `local` (fastembed), `ollama`, or `hash`.
    pub provider: String,
    /// Model name; optional for `local` (defaults to all-minilm-l6-v2).
    pub model: Option<String>,
    /// Vector dimensionality; required for `ollama`, inferred otherwise.
    pub dims: Option<usize>,
    /// Texts per inference batch.
    pub batch_size: usize,
    pub max_retries: u32,
    pub timeout_secs: u64,
    /// Ollama base URL for the `ollama` provider.
    pub url: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "local".to_string(),
            model: None,
            dims: None,
            batch_size: 64,
            max_retries: 5,
            timeout_secs: 30,
            url: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model served by the local Ollama instance.
    pub model: String,
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "qwen2.5-coder:7b".to_string(),
            url: "http://localhost:11434".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8000".to_string(),
        }
    }
}

/// Load and validate a configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Load the configuration if the file exists, otherwise fall back to the
/// built-in defaults (still validated, so default drift gets caught).
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        let config = Config::default();
        validate(&config)?;
        Ok(config)
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.chunking.chunk_size == 0 {
        anyhow::bail!("chunking.chunk_size must be > 0");
    }
    if config.chunking.chunk_overlap >= config.chunking.chunk_size {
        anyhow::bail!("chunking.chunk_overlap must be smaller than chunking.chunk_size");
    }
    if config.indexing.include_globs.is_empty() {
        anyhow::bail!("indexing.include_globs must not be empty");
    }
    if config.retrieval.top_k < 1 {
        anyhow::bail!("retrieval.top_k must be >= 1");
    }
    if config.embedding.dims == Some(0) {
        anyhow::bail!("embedding.dims must be > 0 when set");
    }

    match config.embedding.provider.as_str() {
        "local" | "hash" => {}
        "ollama" => {
            if config.embedding.model.is_none() {
                anyhow::bail!("embedding.model must be specified for the ollama provider");
            }
            if config.embedding.dims.is_none() {
                anyhow::bail!("embedding.dims must be specified for the ollama provider");
            }
        }
        other => anyhow::bail!(
            "Unknown embedding provider: '{}'. Must be local, ollama, or hash.",
            other
        ),
    }

    if config.generation.model.is_empty() {
        anyhow::bail!("generation.model must not be empty");
    }

    Ok(())
}
