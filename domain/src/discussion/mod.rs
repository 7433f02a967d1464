//! Discussion domain.
//!
//! - [`history::DiscussionHistory`]: the shared append-only record
//! - [`verdict::VerdictDetector`]: sentinel detection on streamed judge output
//! - [`phase::DiscussionPhase`]: the run's state machine positions
//! - [`settings::DiscussionSettings`]: round budget and detection mode
//! - [`outcome::DiscussionOutcome`]: what a run hands back

pub mod history;
pub mod outcome;
pub mod phase;
pub mod settings;
pub mod verdict;
