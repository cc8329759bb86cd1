//! # Interview Harness CLI (`ivh`)
//!
//! The `ivh` binary manages the knowledge base and serves the interview
//! API.
//!
//! ## Usage
//!
//! ```bash
//! ivh --config ./config/ivh.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ivh init` | Create the vector extension and embeddings table |
//! | `ivh ingest <file>` | Chunk, embed, and store a document |
//! | `ivh serve` | Start the HTTP API server |
//!
//! ## Examples
//!
//! ```bash
//! # Create the pdf_embeddings table
//! ivh init --config ./config/ivh.toml
//!
//! # Ingest an interview-tips PDF
//! ivh ingest guides/interview-tips.pdf --source interview-tips
//!
//! # Serve the API
//! ivh serve --config ./config/ivh.toml
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use interview_harness::{config, ingest, migrate, server};

/// Interview Harness — an orchestration backend for AI-assisted mock
/// interviews.
#[derive(Parser)]
#[command(
    name = "ivh",
    about = "Interview Harness — an orchestration backend for AI-assisted mock interviews",
    version,
    long_about = "Interview Harness accepts uploaded interview audio and video, delegates \
    transcription, evaluation, and emotion analysis to external APIs, retrieves knowledge-base \
    context from a pgvector-backed Postgres table, and assembles a structured final report."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/ivh.toml`. Database, server, and external
    /// API settings are read from this file; secrets come from the
    /// environment.
    #[arg(long, global = true, default_value = "./config/ivh.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the vector extension and the `pdf_embeddings` table.
    /// This command is idempotent — running it multiple times is safe.
    Init,

    /// Ingest a document into the knowledge base.
    ///
    /// Chunks the file (per page for PDFs), embeds the chunks in one
    /// batch, and appends the rows. Re-ingesting the same file appends
    /// duplicate rows.
    Ingest {
        /// Path to a text or PDF file.
        file: PathBuf,

        /// Source label stored with each row (defaults to the file name).
        #[arg(long)]
        source: Option<String>,
    },

    /// Start the HTTP API server.
    ///
    /// Binds to the address configured in `[server].bind` and serves
    /// the interview session endpoints.
    Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Ingest { file, source } => {
            ingest::run_ingest(&cfg, &file, source).await?;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
