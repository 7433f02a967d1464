//! Domain layer for jury-llm
//!
//! This crate contains the core discussion rules, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Discussion
//!
//! A panel of participants discusses a [`CaseStudy`] over a bounded number
//! of rounds while a judge watches:
//!
//! - **Opening**: every participant answers the case prompt
//! - **Rounds**: participants respond to the most recent exchanges, then the judge evaluates
//! - **Verdict**: the judge opens a reply with `VERDICT:` and the discussion stops,
//!   or the budget runs out and the judge is asked for a final verdict
//!
//! ## History
//!
//! [`DiscussionHistory`] is the single append-only record of everything said.
//! Participants never see it directly, only prompt text rendered from it.

pub mod core;
pub mod discussion;
pub mod participant;
pub mod prompt;
pub mod session;

// Re-export commonly used types
pub use core::{case::CaseStudy, error::DomainError};
pub use discussion::{
    history::DiscussionHistory,
    outcome::{Conclusion, DiscussionOutcome},
    phase::DiscussionPhase,
    settings::{DEFAULT_MAX_ROUNDS, DEFAULT_ROUND_CONTEXT_WINDOW, DiscussionSettings},
    verdict::{VERDICT_SENTINEL, VerdictDetection, VerdictDetector, starts_with_sentinel},
};
pub use participant::entities::{
    DEFAULT_VERDICT_THRESHOLD, JudgeSpec, ParticipantSpec, Provider, ensure_unique_names,
    validate_panel,
};
pub use prompt::PromptTemplate;
pub use session::{
    entities::{Message, Role},
    stream::StreamEvent,
};
