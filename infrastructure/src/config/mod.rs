//! Configuration file loading for jury-llm
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `JURY_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./jury.toml` or `./.jury.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/jury-llm/config.toml`
//! 5. Default values

mod file_config;
mod issue;
mod loader;

pub use file_config::{
    FileConfig, FileDiscussionConfig, FileJudgeConfig, FileOllamaConfig, FileOpenAiConfig,
    FileOutputConfig, FileOutputFormat, FileParticipantConfig, FileProvidersConfig,
};
pub use issue::{ConfigIssue, Severity};
pub use loader::{ConfigError, ConfigLoader};
