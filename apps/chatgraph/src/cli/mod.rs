//! # chatgraph CLI Module
//!
//! This module implements the CLI interface for chatgraph.
//!
//! ## Available Commands
//!
//! - `show` - Show a chat and its messages
//! - `visit` - Walk the chat depth-first
//! - `search` - Find messages containing a phrase
//! - `hydrate` - Resolve id-only edges and report the leftovers
//! - `convert` - Rewrite a chat as JSON or binary
//! - `summarize` - Condense a chat through the completion service

mod commands;

use crate::client::OpenAiClient;
use crate::config::Config;
use crate::error::AppError;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// chatgraph - conversation graphs for LLM chats
///
/// Inspect, walk, search, and summarize chats stored as message graphs.
#[derive(Parser, Debug)]
#[command(name = "chatgraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the config file [default: chatgraph.toml]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Serialized form written by `convert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Indented JSON
    Json,
    /// Header + postcard payload
    Binary,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a chat and its messages
    Show {
        /// Chat file (JSON or binary)
        chat: PathBuf,
    },

    /// Walk the chat depth-first along "out" edges
    Visit {
        /// Chat file (JSON or binary)
        chat: PathBuf,

        /// Start from this message id instead of every message
        #[arg(short, long)]
        from: Option<String>,
    },

    /// Find messages containing a phrase (case-insensitive)
    Search {
        /// Chat file (JSON or binary)
        chat: PathBuf,

        /// Phrase to look for
        query: String,

        /// Also ignore accents and other diacritics
        #[arg(long)]
        ignore_diacritics: bool,
    },

    /// Resolve id-only edges and report those naming no message
    Hydrate {
        /// Chat file (JSON or binary)
        chat: PathBuf,

        /// Fail if any edge stays unresolved
        #[arg(long)]
        strict: bool,
    },

    /// Rewrite a chat in another format
    Convert {
        /// Input chat file (JSON or binary)
        input: PathBuf,

        /// Output file path
        output: PathBuf,

        /// Output format
        #[arg(short = 't', long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },

    /// Summarize a chat through the configured completion service
    Summarize {
        /// Chat file (JSON or binary)
        chat: PathBuf,

        /// Model to ask (overrides config)
        #[arg(short, long)]
        model: Option<String>,

        /// Instruction prompt (overrides config)
        #[arg(short, long)]
        prompt: Option<String>,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments, writing command output to stdout.
pub async fn execute(cli: Cli) -> Result<(), AppError> {
    let json_mode = cli.json_mode;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Show { chat } => cmd_show(&chat, json_mode, &mut out),
        Commands::Visit { chat, from } => cmd_visit(&chat, from.as_deref(), json_mode, &mut out),
        Commands::Search {
            chat,
            query,
            ignore_diacritics,
        } => cmd_search(&chat, &query, ignore_diacritics, json_mode, &mut out),
        Commands::Hydrate { chat, strict } => cmd_hydrate(&chat, strict, json_mode, &mut out),
        Commands::Convert {
            input,
            output,
            format,
        } => cmd_convert(&input, &output, format, json_mode, &mut out),
        Commands::Summarize {
            chat,
            model,
            prompt,
        } => {
            let config = Config::load(cli.config.as_deref())?.with_overrides(model, prompt);
            let client = OpenAiClient::new(config.base_url.clone(), config.api_key.clone());
            tracing::info!("Using model {} at {}", config.model, client.base_url());
            cmd_summarize(&chat, &client, &config, json_mode, &mut out).await
        }
    }
}
