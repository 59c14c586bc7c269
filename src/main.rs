//! # SourceMind CLI (`smd`)
//!
//! The `smd` binary drives the assistant backend. The primary mode is
//! `smd serve`, which starts the HTTP API for the editor shell; `index`
//! and `ask` run the pipeline once in-process, which is useful for
//! validating a configuration or querying a project without a server.
//!
//! The corpus is in-memory and per-process: a one-shot `index` run reports
//! what the server *would* build, it does not leave anything behind.
//!
//! ## Usage
//!
//! ```bash
//! smd --config ./sourcemind.toml <command>
//! ```
//!
//! | Command | Description |
//! |---------|-------------|
//! | `smd serve` | Start the HTTP server |
//! | `smd index <path>` | Index a project once and print the report |
//! | `smd ask <path> "<question>"` | Index a project, retrieve, and ask the model |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use sourcemind::{config, generation, indexer, prompt, retriever, server};

/// SourceMind — a local retrieval-augmented code assistant backend.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; when the file does not exist, built-in defaults apply (local
/// embeddings, Ollama generation on `localhost:11434`).
#[derive(Parser)]
#[command(
    name = "smd",
    about = "SourceMind — a local retrieval-augmented code assistant backend",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./sourcemind.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server.
    ///
    /// Binds to `[server].bind` and serves `/index_project`, `/ask`,
    /// `/edit_inline`, and `/health` with permissive CORS. The corpus
    /// starts empty; the editor shell triggers indexing over HTTP.
    Serve,

    /// Index a project directory once and print the report.
    ///
    /// Walks the directory, chunks and embeds every allow-listed file, and
    /// prints counts plus any skipped-file diagnostics.
    Index {
        /// Project root to index.
        path: PathBuf,
    },

    /// Index a project, retrieve context for a question, and ask the model.
    ///
    /// One-shot pipeline without a server. Requires the generation model
    /// to be reachable (a local Ollama instance by default).
    Ask {
        /// Project root to index.
        path: PathBuf,

        /// The question to answer.
        question: String,

        /// Number of chunks to retrieve (defaults to `retrieval.top_k`).
        #[arg(long)]
        k: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Serve => {
            let corpus = indexer::empty_corpus(&cfg)?;
            server::run_server(&cfg, corpus).await?;
        }
        Commands::Index { path } => {
            let corpus = indexer::empty_corpus(&cfg)?;
            let report = indexer::index_project(&path, &cfg, &corpus).await?;

            println!("indexed {}", path.display());
            println!("  files indexed: {}", report.files_indexed);
            println!("  chunks: {}", report.chunks_indexed);
            println!("  skipped: {}", report.skipped.len());
            for skipped in &report.skipped {
                println!("    {}: {}", skipped.path, skipped.reason);
            }
            println!("ok");
        }
        Commands::Ask { path, question, k } => {
            let corpus = indexer::empty_corpus(&cfg)?;
            let report = indexer::index_project(&path, &cfg, &corpus).await?;
            println!(
                "indexed {} files ({} chunks)",
                report.files_indexed, report.chunks_indexed
            );

            let k = k.unwrap_or(cfg.retrieval.top_k);
            let retrieved = retriever::retrieve(&question, k, &cfg, &corpus).await?;
            let full_prompt = prompt::compose_query_prompt(&retrieved, "", &question);

            match generation::generate(&cfg.generation, &full_prompt).await {
                Ok(answer) => println!("{answer}"),
                Err(e) => println!("Ollama error: {e}. Make sure Ollama is running."),
            }
        }
    }

    Ok(())
}
