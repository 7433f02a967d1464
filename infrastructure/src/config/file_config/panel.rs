//! Panel configuration from TOML (`[judge]` and `[[participants]]`)

use crate::config::issue::ConfigIssue;
use jury_domain::{JudgeSpec, ParticipantSpec, Provider};
use serde::{Deserialize, Serialize};

/// Raw participant seat from TOML
///
/// # Example
///
/// ```toml
/// [[participants]]
/// name = "qwen2.5:3b 1"
/// provider = "ollama"
/// model = "qwen2.5:3b"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileParticipantConfig {
    pub name: String,
    pub provider: String,
    pub model: String,
}

impl Default for FileParticipantConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            provider: Provider::default().to_string(),
            model: String::new(),
        }
    }
}

impl From<&ParticipantSpec> for FileParticipantConfig {
    fn from(spec: &ParticipantSpec) -> Self {
        Self {
            name: spec.name.clone(),
            provider: spec.provider.to_string(),
            model: spec.model.clone(),
        }
    }
}

impl FileParticipantConfig {
    /// Parse into a domain seat, collecting issues under `field`.
    pub fn parse(&self, field: &str) -> (Option<ParticipantSpec>, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        if self.name.trim().is_empty() {
            issues.push(ConfigIssue::error(format!("{}.name cannot be empty", field)));
        }
        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(format!("{}.model cannot be empty", field)));
        }
        let provider = match self.provider.parse::<Provider>() {
            Ok(p) => Some(p),
            Err(e) => {
                issues.push(ConfigIssue::error(format!("{}.provider: {}", field, e)));
                None
            }
        };

        match provider {
            Some(provider) if issues.is_empty() => (
                Some(ParticipantSpec::new(&self.name, provider, &self.model)),
                issues,
            ),
            _ => (None, issues),
        }
    }
}

/// Raw judge seat from TOML
///
/// # Example
///
/// ```toml
/// [judge]
/// name = "Judge qwen2.5:14b"
/// model = "qwen2.5:14b"
/// verdict_threshold = 0.8
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJudgeConfig {
    pub name: String,
    pub provider: String,
    pub model: String,
    /// Advisory; only logged
    pub verdict_threshold: f32,
}

impl Default for FileJudgeConfig {
    fn default() -> Self {
        let judge = JudgeSpec::default();
        Self {
            name: judge.participant.name,
            provider: judge.participant.provider.to_string(),
            model: judge.participant.model,
            verdict_threshold: judge.verdict_threshold,
        }
    }
}

impl FileJudgeConfig {
    pub fn parse(&self) -> (Option<JudgeSpec>, Vec<ConfigIssue>) {
        let seat = FileParticipantConfig {
            name: self.name.clone(),
            provider: self.provider.clone(),
            model: self.model.clone(),
        };
        let (participant, mut issues) = seat.parse("judge");

        if !(0.0..=1.0).contains(&self.verdict_threshold) {
            issues.push(ConfigIssue::warning(format!(
                "judge.verdict_threshold {} is outside 0.0..=1.0",
                self.verdict_threshold
            )));
        }

        let judge = participant.map(|p| JudgeSpec::new(p).with_threshold(self.verdict_threshold));
        (judge, issues)
    }
}
