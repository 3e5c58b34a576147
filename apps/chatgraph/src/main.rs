//! # chatgraph
//!
//! The main binary for chatgraph conversation graphs.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                apps/chatgraph (THE BINARY)            │
//! │                                                       │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐  │
//! │  │    CLI      │   │   Config    │   │ Completion  │  │
//! │  │   (clap)    │   │   (toml)    │   │  (reqwest)  │  │
//! │  └──────┬──────┘   └──────┬──────┘   └──────┬──────┘  │
//! │         └─────────────────┼─────────────────┘         │
//! │                           ▼                           │
//! │                  ┌────────────────┐                   │
//! │                  │ chatgraph-core │                   │
//! │                  │  (THE LOGIC)   │                   │
//! │                  └────────────────┘                   │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! chatgraph show chat.json
//! chatgraph visit chat.json --from 1
//! chatgraph search chat.json father
//! chatgraph convert chat.json chat.cgrf --format binary
//! chatgraph summarize chat.cgrf --model gpt-4o-mini
//! ```

use chatgraph::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // CHATGRAPH_LOG_FORMAT=json enables machine-parseable logs. Logs go to
    // stderr; stdout carries command output.
    let log_format = std::env::var("CHATGRAPH_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "chatgraph=debug,chatgraph_core=debug"
    } else {
        "chatgraph=info,chatgraph_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
