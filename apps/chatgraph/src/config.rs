//! # Configuration
//!
//! Settings for the completion service, layered lowest to highest:
//! defaults, `chatgraph.toml`, environment, command-line flags.
//!
//! ```toml
//! model = "gpt-4o-mini"
//! base_url = "https://api.openai.com/v1"
//! api_key = "sk-..."
//! summary_prompt = "Summarize in one sentence."
//! ```

use crate::error::AppError;
use chatgraph_core::DEFAULT_SUMMARY_PROMPT;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "chatgraph.toml";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

// =============================================================================
// FILE LAYER
// =============================================================================

/// The optional keys of `chatgraph.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub summary_prompt: Option<String>,
}

impl FileConfig {
    /// Read a config file. A missing file yields the empty config; an
    /// unreadable or malformed one is an error.
    pub fn read(path: &Path) -> Result<Self, AppError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config file at {}", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(AppError::File {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        toml::from_str(&content).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}

// =============================================================================
// RESOLVED CONFIG
// =============================================================================

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub model: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub summary_prompt: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            summary_prompt: DEFAULT_SUMMARY_PROMPT.to_string(),
        }
    }
}

impl Config {
    /// Load from `path` (or `chatgraph.toml`) and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let file = FileConfig::read(&path)?;
        Ok(Self::resolve(file, |key| std::env::var(key).ok()))
    }

    /// Merge a file layer with an environment lookup.
    ///
    /// `CHATGRAPH_API_KEY` wins over the file, which wins over `OPENAI_API_KEY`.
    /// Empty values count as unset.
    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let env = |key: &str| env(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        Self {
            model: env("CHATGRAPH_MODEL")
                .or(file.model)
                .unwrap_or(defaults.model),
            base_url: env("CHATGRAPH_BASE_URL")
                .or(file.base_url)
                .unwrap_or(defaults.base_url),
            api_key: env("CHATGRAPH_API_KEY")
                .or(file.api_key)
                .or_else(|| env("OPENAI_API_KEY")),
            summary_prompt: file.summary_prompt.unwrap_or(defaults.summary_prompt),
        }
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn with_overrides(mut self, model: Option<String>, prompt: Option<String>) -> Self {
        if let Some(model) = model {
            self.model = model;
        }
        if let Some(prompt) = prompt {
            self.summary_prompt = prompt;
        }
        self
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = Config::resolve(FileConfig::default(), env_of(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.summary_prompt, DEFAULT_SUMMARY_PROMPT);
    }

    #[test]
    fn env_overrides_file() {
        let file = FileConfig {
            model: Some("file-model".to_string()),
            base_url: Some("http://file".to_string()),
            ..FileConfig::default()
        };
        let config = Config::resolve(file, env_of(&[("CHATGRAPH_MODEL", "env-model")]));

        assert_eq!(config.model, "env-model");
        assert_eq!(config.base_url, "http://file");
    }

    #[test]
    fn openai_key_is_a_fallback() {
        let config = Config::resolve(FileConfig::default(), env_of(&[("OPENAI_API_KEY", "sk-o")]));
        assert_eq!(config.api_key.as_deref(), Some("sk-o"));

        let file = FileConfig {
            api_key: Some("sk-file".to_string()),
            ..FileConfig::default()
        };
        let config = Config::resolve(file, env_of(&[("OPENAI_API_KEY", "sk-o")]));
        assert_eq!(config.api_key.as_deref(), Some("sk-file"));

        let config = Config::resolve(
            FileConfig::default(),
            env_of(&[("OPENAI_API_KEY", "sk-o"), ("CHATGRAPH_API_KEY", "sk-c")]),
        );
        assert_eq!(config.api_key.as_deref(), Some("sk-c"));
    }

    #[test]
    fn empty_env_values_ignored() {
        let config = Config::resolve(FileConfig::default(), env_of(&[("CHATGRAPH_MODEL", "")]));
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn cli_overrides_win() {
        let config = Config::default().with_overrides(Some("m".to_string()), None);
        assert_eq!(config.model, "m");
        assert_eq!(config.summary_prompt, DEFAULT_SUMMARY_PROMPT);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let file = FileConfig::read(&dir.path().join("absent.toml")).expect("read");
        assert_eq!(file, FileConfig::default());
    }

    #[test]
    fn file_is_parsed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chatgraph.toml");
        std::fs::write(&path, "model = \"local\"\nbase_url = \"http://127.0.0.1:8000/v1\"\n")
            .expect("write");

        let file = FileConfig::read(&path).expect("read");
        assert_eq!(file.model.as_deref(), Some("local"));
        assert_eq!(file.base_url.as_deref(), Some("http://127.0.0.1:8000/v1"));
        assert!(file.api_key.is_none());
    }

    #[test]
    fn malformed_file_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chatgraph.toml");
        std::fs::write(&path, "model = \nunknown_key = 1").expect("write");

        assert!(matches!(
            FileConfig::read(&path),
            Err(AppError::Config { .. })
        ));
    }
}
