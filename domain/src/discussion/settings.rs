//! Discussion settings (Value Object)

use super::verdict::VerdictDetection;
use serde::{Deserialize, Serialize};

/// Default number of discussion rounds
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

/// Default number of recent history entries shown to participants each round
pub const DEFAULT_ROUND_CONTEXT_WINDOW: usize = 3;

/// Tunables for a single discussion run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscussionSettings {
    /// Round budget. Zero skips straight to the final verdict.
    pub max_rounds: u32,
    /// How many recent history entries each participant sees per round
    pub round_context_window: usize,
    pub verdict_detection: VerdictDetection,
}

impl Default for DiscussionSettings {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            round_context_window: DEFAULT_ROUND_CONTEXT_WINDOW,
            verdict_detection: VerdictDetection::default(),
        }
    }
}

impl DiscussionSettings {
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_round_context_window(mut self, window: usize) -> Self {
        self.round_context_window = window;
        self
    }

    pub fn with_verdict_detection(mut self, detection: VerdictDetection) -> Self {
        self.verdict_detection = detection;
        self
    }
}
