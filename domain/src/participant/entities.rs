//! Participant descriptions
//!
//! These describe *who* sits on the panel. The live participant (with its
//! backend and private context) is built from them in the application layer.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default advisory verdict threshold for judges
pub const DEFAULT_VERDICT_THRESHOLD: f32 = 0.8;

/// Backend family serving a participant's model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Ollama,
    #[serde(rename = "openai")]
    OpenAi,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Ollama => "ollama",
            Provider::OpenAi => "openai",
        }
    }

    pub fn all() -> [Provider; 2] {
        [Provider::Ollama, Provider::OpenAi]
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ollama" => Ok(Provider::Ollama),
            "openai" => Ok(Provider::OpenAi),
            other => Err(DomainError::UnknownProvider(other.to_string())),
        }
    }
}

/// A panel seat: display name plus the model that speaks for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    pub name: String,
    #[serde(default)]
    pub provider: Provider,
    pub model: String,
}

impl ParticipantSpec {
    pub fn new(name: impl Into<String>, provider: Provider, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provider,
            model: model.into(),
        }
    }

    /// Shorthand for an Ollama-served participant
    pub fn ollama(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(name, Provider::Ollama, model)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidParticipant(
                "participant name cannot be empty".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(DomainError::InvalidParticipant(format!(
                "participant '{}' has no model",
                self.name
            )));
        }
        Ok(())
    }

    /// The panel used when nothing is configured
    pub fn default_roster() -> Vec<ParticipantSpec> {
        vec![
            ParticipantSpec::ollama("qwen2.5:3b 1", "qwen2.5:3b"),
            ParticipantSpec::ollama("llama3.2:3b 1", "llama3.2:3b"),
            ParticipantSpec::ollama("qwen2.5:3b 2", "qwen2.5:3b"),
            ParticipantSpec::ollama("qwen2.5:14b", "qwen2.5:14b"),
        ]
    }
}

/// The judge's seat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeSpec {
    #[serde(flatten)]
    pub participant: ParticipantSpec,
    /// Advisory only: termination is driven by the verdict sentinel
    #[serde(default = "default_threshold")]
    pub verdict_threshold: f32,
}

fn default_threshold() -> f32 {
    DEFAULT_VERDICT_THRESHOLD
}

impl JudgeSpec {
    pub fn new(participant: ParticipantSpec) -> Self {
        Self {
            participant,
            verdict_threshold: DEFAULT_VERDICT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.verdict_threshold = threshold;
        self
    }
}

impl Default for JudgeSpec {
    fn default() -> Self {
        Self::new(ParticipantSpec::ollama("Judge qwen2.5:14b", "qwen2.5:14b"))
    }
}

/// Check that every seat is valid and that names are unique across the
/// whole panel, judge included (history entries are attributed by name).
pub fn validate_panel(participants: &[ParticipantSpec], judge: &JudgeSpec) -> Result<(), DomainError> {
    let panel = || participants.iter().chain(std::iter::once(&judge.participant));
    for spec in panel() {
        spec.validate()?;
    }
    ensure_unique_names(panel().map(|spec| spec.name.as_str()))
}

/// Reject blank or repeated speaker names
pub fn ensure_unique_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidParticipant(
                "participant name cannot be empty".to_string(),
            ));
        }
        if !seen.insert(name) {
            return Err(DomainError::DuplicateParticipant(name.to_string()));
        }
    }
    Ok(())
}
