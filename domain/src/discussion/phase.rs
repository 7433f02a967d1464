//! Discussion phases

use serde::{Deserialize, Serialize};

/// Where a discussion run currently is.
///
/// ```text
/// Initializing → BroadcastingInitial → InRound(r) → PollingJudge(r) ─┬→ Done   (verdict)
///                                          ↑______________________|  │
///                                                                    └→ Concluding → Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "phase", content = "round", rename_all = "snake_case")]
pub enum DiscussionPhase {
    /// Case prompt is formatted and recorded
    Initializing,
    /// Every participant answers the case prompt
    BroadcastingInitial,
    /// Participants respond to the recent discussion
    InRound(u32),
    /// The judge evaluates the full discussion
    PollingJudge(u32),
    /// The judge is asked for a final verdict
    Concluding,
    /// Terminal
    Done,
}

impl DiscussionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscussionPhase::Initializing => "initializing",
            DiscussionPhase::BroadcastingInitial => "broadcasting_initial",
            DiscussionPhase::InRound(_) => "in_round",
            DiscussionPhase::PollingJudge(_) => "polling_judge",
            DiscussionPhase::Concluding => "concluding",
            DiscussionPhase::Done => "done",
        }
    }

    /// Round number for round-scoped phases
    pub fn round(&self) -> Option<u32> {
        match self {
            DiscussionPhase::InRound(r) | DiscussionPhase::PollingJudge(r) => Some(*r),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DiscussionPhase::Done)
    }
}

impl std::fmt::Display for DiscussionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DiscussionPhase::Initializing => write!(f, "Initializing"),
            DiscussionPhase::BroadcastingInitial => write!(f, "Opening statements"),
            DiscussionPhase::InRound(r) => write!(f, "Round {}", r),
            DiscussionPhase::PollingJudge(r) => write!(f, "Judge review (round {})", r),
            DiscussionPhase::Concluding => write!(f, "Final verdict"),
            DiscussionPhase::Done => write!(f, "Done"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(DiscussionPhase::InRound(2).to_string(), "Round 2");
        assert_eq!(
            DiscussionPhase::PollingJudge(3).to_string(),
            "Judge review (round 3)"
        );
        assert_eq!(DiscussionPhase::Concluding.to_string(), "Final verdict");
    }

    #[test]
    fn test_round_accessor() {
        assert_eq!(DiscussionPhase::InRound(4).round(), Some(4));
        assert_eq!(DiscussionPhase::PollingJudge(1).round(), Some(1));
        assert_eq!(DiscussionPhase::Concluding.round(), None);
    }

    #[test]
    fn test_only_done_is_terminal() {
        assert!(DiscussionPhase::Done.is_terminal());
        assert!(!DiscussionPhase::Concluding.is_terminal());
    }

    #[test]
    fn test_serialize_round_phase() {
        let json = serde_json::to_value(DiscussionPhase::InRound(2)).unwrap();
        assert_eq!(json, serde_json::json!({"phase": "in_round", "round": 2}));
    }
}
