//! Discussion observer port
//!
//! Defines the sink that receives streamed fragments and phase changes
//! during a discussion.

use jury_domain::DiscussionPhase;

/// Who is speaking in a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Participant,
    Judge,
}

/// Callbacks for discussion progress
///
/// Implementations live in the presentation layer (console, tests, ...).
/// Callbacks run on the discussion task: a slow observer slows the
/// whole discussion.
pub trait DiscussionObserver: Send + Sync {
    /// Called once per emitted fragment, in emission order
    fn on_fragment(&self, participant: &str, fragment: &str);

    /// Called when the run enters a new phase
    fn on_phase(&self, _phase: &DiscussionPhase) {}

    /// Called before a participant or the judge is prompted
    fn on_turn_start(&self, _participant: &str, _speaker: Speaker) {}

    /// Called when a turn's stream has been fully consumed (or abandoned)
    fn on_turn_end(&self, _participant: &str) {}

    /// Called when the judge's stream signals a verdict
    fn on_verdict(&self, _judge: &str, _round: u32) {}
}

/// No-op observer for when output is not needed
pub struct NoObserver;

impl DiscussionObserver for NoObserver {
    fn on_fragment(&self, _participant: &str, _fragment: &str) {}
}
