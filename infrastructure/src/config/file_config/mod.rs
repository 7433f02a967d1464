//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Enum-like fields stay strings here so that bad values surface as
//! [`ConfigIssue`]s instead of opaque deserialization errors.

mod discussion;
mod output;
mod panel;
mod providers;

pub use discussion::FileDiscussionConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use panel::{FileJudgeConfig, FileParticipantConfig};
pub use providers::{FileOllamaConfig, FileOpenAiConfig, FileProvidersConfig};

use crate::config::issue::ConfigIssue;
use jury_domain::{DiscussionSettings, JudgeSpec, ParticipantSpec, ensure_unique_names};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Round budget and verdict detection
    pub discussion: FileDiscussionConfig,
    /// The judge's seat
    pub judge: FileJudgeConfig,
    /// Provider endpoints
    pub providers: FileProvidersConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Panel members, in speaking order
    pub participants: Vec<FileParticipantConfig>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            discussion: FileDiscussionConfig::default(),
            judge: FileJudgeConfig::default(),
            providers: FileProvidersConfig::default(),
            output: FileOutputConfig::default(),
            participants: ParticipantSpec::default_roster()
                .iter()
                .map(FileParticipantConfig::from)
                .collect(),
        }
    }
}

impl FileConfig {
    pub fn parse_settings(&self) -> (DiscussionSettings, Vec<ConfigIssue>) {
        self.discussion.to_settings()
    }

    /// Parse every seat; invalid seats are dropped and reported.
    pub fn parse_participants(&self) -> (Vec<ParticipantSpec>, Vec<ConfigIssue>) {
        let mut specs = Vec::new();
        let mut issues = Vec::new();
        for (i, seat) in self.participants.iter().enumerate() {
            let (spec, seat_issues) = seat.parse(&format!("participants[{}]", i));
            specs.extend(spec);
            issues.extend(seat_issues);
        }
        (specs, issues)
    }

    pub fn parse_judge(&self) -> (Option<JudgeSpec>, Vec<ConfigIssue>) {
        self.judge.parse()
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks, in order: discussion settings, every participant seat, the
    /// judge seat, then name uniqueness across the whole panel.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        issues.extend(self.parse_settings().1);

        let (participants, participant_issues) = self.parse_participants();
        issues.extend(participant_issues);

        let (judge, judge_issues) = self.parse_judge();
        issues.extend(judge_issues);

        if self.participants.is_empty() {
            issues.push(ConfigIssue::warning(
                "no participants configured: only the judge will speak",
            ));
        }

        if let Some(judge) = judge {
            let names = participants
                .iter()
                .map(|p| p.name.as_str())
                .chain(std::iter::once(judge.participant.name.as_str()));
            if let Err(e) = ensure_unique_names(names) {
                issues.push(ConfigIssue::error(e.to_string()));
            }
        }

        issues
    }
}
