//! # chatgraph
//!
//! The command-line application around `chatgraph-core`.
//!
//! - [`cli`] - clap commands over chat files
//! - [`config`] - TOML file + environment settings
//! - [`client`] - OpenAI-compatible completion client
//! - [`error`] - the application error type

pub mod cli;
pub mod client;
pub mod config;
pub mod error;

pub use client::{ClientError, OpenAiClient};
pub use config::Config;
pub use error::AppError;
