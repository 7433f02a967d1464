//! Discussion results (Value Objects)

use super::history::DiscussionHistory;
use crate::session::entities::Message;
use serde::{Deserialize, Serialize};

/// How a discussion ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Conclusion {
    /// The judge signaled a verdict while polling in `round`
    Verdict { round: u32 },
    /// The round budget ran out and the judge was asked for a final verdict
    ForcedVerdict,
    /// The caller stopped the discussion
    Cancelled,
}

impl Conclusion {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Conclusion::Cancelled)
    }
}

/// Result of a completed (or cancelled) discussion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussionOutcome {
    pub conclusion: Conclusion,
    /// Rounds that ran through their judge poll
    pub rounds_completed: u32,
    pub judge: String,
    pub history: DiscussionHistory,
}

impl DiscussionOutcome {
    pub fn new(
        conclusion: Conclusion,
        rounds_completed: u32,
        judge: impl Into<String>,
        history: DiscussionHistory,
    ) -> Self {
        Self {
            conclusion,
            rounds_completed,
            judge: judge.into(),
            history,
        }
    }

    /// The judge's last recorded message
    pub fn final_verdict(&self) -> Option<&Message> {
        self.history
            .messages()
            .iter()
            .rev()
            .find(|m| m.author() == Some(self.judge.as_str()))
    }

    pub fn reached_verdict(&self) -> bool {
        matches!(self.conclusion, Conclusion::Verdict { .. })
    }
}
