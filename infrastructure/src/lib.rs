//! Infrastructure layer for jury-llm
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer:
//!
//! - [`backends`]: Ollama and OpenAI-compatible streaming chat backends
//! - [`config`]: TOML/env configuration loading with figment
//! - [`logging`]: JSONL discussion transcripts

pub mod backends;
pub mod config;
pub mod logging;

pub use backends::{BackendFactory, OllamaBackend, OpenAiBackend};
pub use config::{
    ConfigError, ConfigIssue, ConfigLoader, FileConfig, FileOutputConfig, FileOutputFormat,
    Severity,
};
pub use logging::JsonlTranscriptLogger;
