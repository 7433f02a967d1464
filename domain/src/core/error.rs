//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid case study: {0}")]
    InvalidCase(String),

    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),

    #[error("Duplicate participant name: {0}")]
    DuplicateParticipant(String),

    #[error("Unknown provider: '{0}' (expected: ollama, openai)")]
    UnknownProvider(String),

    #[error("Unknown verdict detection mode: '{0}' (expected: fragment, message)")]
    UnknownVerdictDetection(String),
}
