//! Application layer for jury-llm
//!
//! This crate contains the discussion use case, the live participant type,
//! and the port definitions adapters implement.
//! It depends only on the domain layer.

pub mod participant;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use participant::{Participant, ParticipantKind};
pub use ports::{
    backend::{BackendError, ChatBackend, STREAM_CHANNEL_CAPACITY, StreamHandle},
    observer::{DiscussionObserver, NoObserver, Speaker},
    transcript::{NoTranscript, TranscriptEvent, TranscriptLogger},
};
pub use use_cases::run_discussion::{RunDiscussionError, RunDiscussionInput, RunDiscussionUseCase};
pub use use_cases::stream_consumer::{StreamConsumer, TurnOutput};
