//! Provider configuration from TOML (`[providers]` section)

use crate::backends::{DEFAULT_OLLAMA_URL, DEFAULT_OPENAI_KEY_ENV, DEFAULT_OPENAI_URL};
use serde::{Deserialize, Serialize};

/// Ollama server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOllamaConfig {
    pub base_url: String,
}

impl Default for FileOllamaConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
        }
    }
}

/// OpenAI-compatible API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Base URL (override for self-hosted OpenAI-compatible servers).
    pub base_url: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key_env: DEFAULT_OPENAI_KEY_ENV.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub ollama: FileOllamaConfig,
    pub openai: FileOpenAiConfig,
}
