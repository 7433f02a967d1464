//! Case study value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// The case put before the jury (Value Object)
///
/// Wraps the raw case text. Blank cases are rejected because every
/// participant prompt is built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseStudy {
    content: String,
}

impl CaseStudy {
    /// Create a new case, rejecting empty or whitespace-only text
    pub fn new(content: impl Into<String>) -> Result<Self, DomainError> {
        Self::try_new(content)
            .ok_or_else(|| DomainError::InvalidCase("case text cannot be empty".to_string()))
    }

    /// Try to create a new case, returning None if invalid
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        if content.trim().is_empty() {
            None
        } else {
            Some(Self { content })
        }
    }

    /// Get the case content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for CaseStudy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}
