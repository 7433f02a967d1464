//! Discussion configuration from TOML (`[discussion]` section)

use crate::config::issue::ConfigIssue;
use jury_domain::{
    DEFAULT_MAX_ROUNDS, DEFAULT_ROUND_CONTEXT_WINDOW, DiscussionSettings, VerdictDetection,
};
use serde::{Deserialize, Serialize};

/// Raw discussion settings from TOML
///
/// # Example
///
/// ```toml
/// [discussion]
/// max_rounds = 5
/// round_context_window = 3
/// verdict_detection = "fragment"   # or "message"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileDiscussionConfig {
    pub max_rounds: u32,
    pub round_context_window: usize,
    pub verdict_detection: String,
}

impl Default for FileDiscussionConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            round_context_window: DEFAULT_ROUND_CONTEXT_WINDOW,
            verdict_detection: VerdictDetection::default().to_string(),
        }
    }
}

impl FileDiscussionConfig {
    /// Convert to domain settings, falling back to defaults for bad values.
    pub fn to_settings(&self) -> (DiscussionSettings, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let verdict_detection = match self.verdict_detection.parse::<VerdictDetection>() {
            Ok(mode) => mode,
            Err(_) => {
                issues.push(ConfigIssue::error(format!(
                    "discussion.verdict_detection: unknown value '{}' (expected: fragment, message)",
                    self.verdict_detection
                )));
                VerdictDetection::default()
            }
        };

        if self.round_context_window == 0 {
            issues.push(ConfigIssue::warning(
                "discussion.round_context_window is 0: participants will not see the discussion",
            ));
        }

        let settings = DiscussionSettings::default()
            .with_max_rounds(self.max_rounds)
            .with_round_context_window(self.round_context_window)
            .with_verdict_detection(verdict_detection);
        (settings, issues)
    }
}
