//! # SourceMind
//!
//! A local retrieval-augmented code assistant backend.
//!
//! SourceMind indexes a project directory into chunked, embedded text,
//! retrieves the chunks nearest to a question, and forwards a composed
//! prompt to a locally hosted language model (Ollama) for an answer or an
//! inline code edit. The corpus lives in memory for the lifetime of the
//! process and is rebuilt wholesale on each indexing request.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌───────────────────┐
//! │  Project  │──▶│   Indexer     │──▶│      Corpus        │
//! │ directory │   │ chunk + embed │   │ FlatIndex ∥ chunks │
//! └───────────┘   └──────────────┘   └─────────┬─────────┘
//!                                              │ snapshot
//!                      ┌───────────┐   ┌───────▼───────┐
//!                      │  Ollama   │◀──│   Retriever    │
//!                      │ /generate │   │ + PromptComposer│
//!                      └───────────┘   └───────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`chunker`] | Boundary-marker text splitting |
//! | [`embedding`] | Embedding provider abstraction |
//! | [`index`] | Exact nearest-neighbor vector index |
//! | [`store`] | Position-addressed chunk store |
//! | [`corpus`] | Lockstep index/store pair with atomic publish |
//! | [`indexer`] | Directory walk → chunk → embed → publish |
//! | [`retriever`] | Query embedding and nearest-neighbor resolution |
//! | [`prompt`] | Prompt templates for the generation model |
//! | [`generation`] | Ollama generation client |
//! | [`server`] | HTTP API with permissive CORS |
//! | [`error`] | Typed indexing/retrieval errors |

pub mod chunker;
pub mod config;
pub mod corpus;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod indexer;
pub mod models;
pub mod prompt;
pub mod retriever;
pub mod server;
pub mod store;

pub use error::{IndexError, Result};
